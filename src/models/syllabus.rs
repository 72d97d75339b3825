//! Syllabus vocabulary shared by the generator, the leaderboard and the UI.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The eight KSSR topics. Serialized by their Malay titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Topic {
    #[serde(rename = "Nombor dan Operasi")]
    Nombor,
    #[serde(rename = "Pecahan dan Perpuluhan")]
    Pecahan,
    #[serde(rename = "Wang dan Kewangan")]
    Wang,
    #[serde(rename = "Masa dan Waktu")]
    Masa,
    #[serde(rename = "Panjang, Jisim dan Isi Padu")]
    Ukuran,
    #[serde(rename = "Ruang, Bentuk dan Geometri")]
    Ruang,
    #[serde(rename = "Koordinat, Nisbah dan Kadaran")]
    Koordinat,
    #[serde(rename = "Pengurusan Data")]
    Data,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Nombor,
        Topic::Pecahan,
        Topic::Wang,
        Topic::Masa,
        Topic::Ukuran,
        Topic::Ruang,
        Topic::Koordinat,
        Topic::Data,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Topic::Nombor => "Nombor dan Operasi",
            Topic::Pecahan => "Pecahan dan Perpuluhan",
            Topic::Wang => "Wang dan Kewangan",
            Topic::Masa => "Masa dan Waktu",
            Topic::Ukuran => "Panjang, Jisim dan Isi Padu",
            Topic::Ruang => "Ruang, Bentuk dan Geometri",
            Topic::Koordinat => "Koordinat, Nisbah dan Kadaran",
            Topic::Data => "Pengurusan Data",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Practice mode. Also used as the per-question difficulty tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Difficulty {
    #[default]
    Mudah,
    Sederhana,
    Sukar,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Mudah, Difficulty::Sederhana, Difficulty::Sukar];

    /// How many questions a session of this mode asks for.
    pub fn question_count(self) -> usize {
        match self {
            Difficulty::Mudah => 10,
            Difficulty::Sederhana => 30,
            Difficulty::Sukar => 50,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Mudah => "Mudah",
            Difficulty::Sederhana => "Sederhana",
            Difficulty::Sukar => "Sukar",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("grade must be between 1 and 6, got {0}")]
pub struct InvalidGrade(pub u8);

/// School year (Tahun) 1 to 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(value: u8) -> Result<Self, InvalidGrade> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidGrade(value))
        }
    }

    pub fn all() -> impl Iterator<Item = Grade> {
        (Self::MIN..=Self::MAX).map(Grade)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Typical pupil age for this year.
    pub fn age(self) -> u8 {
        self.0 + 6
    }
}

impl TryFrom<u8> for Grade {
    type Error = InvalidGrade;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::new(value)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
