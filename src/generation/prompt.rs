//! Prompt text sent to the provider.

use serde_json::{Value, json};

use crate::models::{Difficulty, Grade, Topic};

pub const QUESTION_TEMPERATURE: f32 = 0.7;

const SYLLABUS_GUIDELINES: [&str; 6] = [
    "Tahun 1: Nombor hingga 100. Operasi tambah/tolak asas. Pecahan (1/2, 1/4) sahaja. Wang (RM/sen). Masa (Siang/Malam, Jam mudah). Tiada perpuluhan/peratus.",
    "Tahun 2: Nombor hingga 1000. Darab & Bahagi (sifir 2,5,10,4, etc). Perpuluhan mudah. Bentuk 2D/3D asas.",
    "Tahun 3: Nombor hingga 10000. Pecahan wajar, Perpuluhan, Peratus. Wang hingga RM1000. Masa (Minit).",
    "Tahun 4: Nombor hingga 100,000. Koordinat (Suku pertama). Nisbah.",
    "Tahun 5: Nombor hingga 1,000,000. Nombor Perdana. Gandaan. Ruang (Perimeter/Luas/Isipadu).",
    "Tahun 6: Nombor hingga 10,000,000. Kebarangkalian. Cukai/Insurans (Kewangan).",
];

fn difficulty_instruction(mode: Difficulty) -> &'static str {
    match mode {
        Difficulty::Mudah => {
            "Fokus kepada soalan asas dan terus (direct questions). Kurangkan soalan KBAT. Pastikan soalan mudah difahami."
        }
        Difficulty::Sederhana => {
            "Campuran seimbang antara soalan mudah dan sederhana. Masukkan sedikit elemen penyelesaian masalah."
        }
        Difficulty::Sukar => {
            "Fokus kepada soalan yang mencabar, penyelesaian masalah berayat, dan elemen KBAT (Kemahiran Berfikir Aras Tinggi)."
        }
    }
}

fn syllabus_guidelines(grade: Grade) -> String {
    let mut text = format!("Panduan DSKP KSSR Semakan Mengikut Tahun {}:\n", grade);
    for line in SYLLABUS_GUIDELINES {
        text.push_str("- ");
        text.push_str(line);
        text.push('\n');
    }
    text
}

pub fn question_prompt(topic: Topic, grade: Grade, count: usize, mode: Difficulty) -> String {
    format!(
        "Anda adalah Cikgu Syafiq, seorang guru matematik yang pakar dengan silibus Malaysia (KSSR Semakan).
Sila jana **{count}** soalan matematik objektif (pilihan ganda) dalam Bahasa Melayu untuk murid **Tahun {grade}** (Darjah {grade}).

Topik: \"{topic}\".
Mod Latihan: **{mode}**.

{guidelines}
Syarat Penting:
1. Soalan MESTI 100% menepati silibus Tahun {grade}.
2. Gunakan laras bahasa yang sesuai dengan umur murid.
3. **VISUAL (SVG):**
   - Jika soalan memerlukan gambar rajah (wajib untuk soalan bentuk, pecahan, masa, dan pengiraan objek), sertakan kod SVG dalam field 'svg'.
   - **Gaya Visual:** Flat design, kartun, garisan tebal (stroke-width: 2-4), warna cerah yang kontras dan menarik untuk kanak-kanak.
   - **Teknikal:** Gunakan viewBox=\"0 0 400 300\". Pastikan elemen lukisan besar dan memenuhi ruang. Jangan gunakan text kecil.
4. {instruction}
5. Pastikan anda menjana TEPAT {count} soalan.
",
        guidelines = syllabus_guidelines(grade),
        instruction = difficulty_instruction(mode),
    )
}

pub fn explanation_prompt(question: &str, answer: &str, grade: Grade) -> String {
    format!(
        "Soalan: \"{question}\"
Jawapan Betul: \"{answer}\"
Sasaran Murid: Tahun {grade} (Umur {age} tahun).

Anda adalah Cikgu Syafiq. Terangkan jalan kerja untuk mendapatkan jawapan ini.
Gunakan Bahasa Melayu yang mudah difahami, ceria, dan menggalakkan.
Gunakan analogi jika perlu (contohnya buah, gula-gula) terutamanya untuk Tahun 1-3.
Jangan terlalu panjang, ringkas dan padat (maksimum 3 ayat atau langkah).
",
        age = grade.age(),
    )
}

/// Shape the provider must follow for a question batch.
pub fn question_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "questionText": {
                    "type": "STRING",
                    "description": "The math question text in Malay."
                },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "An array of 4 multiple choice options."
                },
                "correctAnswerIndex": {
                    "type": "INTEGER",
                    "description": "The index (0-3) of the correct answer in the options array."
                },
                "difficulty": {
                    "type": "STRING",
                    "enum": ["Mudah", "Sederhana", "Sukar"],
                    "description": "The difficulty level of this specific question."
                },
                "svg": {
                    "type": "STRING",
                    "description": "Optional. A complete, valid SVG string (starting with <svg...>) to visualize the question. ViewBox 0 0 400 300."
                }
            },
            "required": ["questionText", "options", "correctAnswerIndex", "difficulty"]
        }
    })
}
