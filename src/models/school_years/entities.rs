use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学期
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school_year.ts")]
pub enum Semester {
    Ganjil,
    Genap,
}

impl Semester {
    pub const ALL: [Semester; 2] = [Semester::Ganjil, Semester::Genap];
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Semester::Ganjil => write!(f, "Ganjil"),
            Semester::Genap => write!(f, "Genap"),
        }
    }
}

impl std::str::FromStr for Semester {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ganjil" => Ok(Semester::Ganjil),
            "Genap" => Ok(Semester::Genap),
            _ => Err(format!("Invalid semester: {s}")),
        }
    }
}

/// 学年（含学期）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school_year.ts")]
pub struct SchoolYear {
    pub id: i64,
    pub name: String,
    pub start_year: i32,
    pub semester: Semester,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub const MIN_START_YEAR: i32 = 2000;
pub const MAX_START_YEAR: i32 = 2100;

/// 学年名称，例如 `2024/2025 - Ganjil`
pub fn school_year_name(start_year: i32, semester: Semester) -> String {
    format!("{}/{} - {}", start_year, start_year + 1, semester)
}

/// 一个起始年份对应的两条学期记录名称
pub fn school_year_names(start_year: i32) -> Result<Vec<(Semester, String)>, String> {
    if !(MIN_START_YEAR..=MAX_START_YEAR).contains(&start_year) {
        return Err(format!(
            "起始年份必须在 {MIN_START_YEAR} 到 {MAX_START_YEAR} 之间"
        ));
    }
    Ok(Semester::ALL
        .into_iter()
        .map(|s| (s, school_year_name(start_year, s)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_year_yields_two_semesters() {
        let names = school_year_names(2024).unwrap();
        assert_eq!(
            names,
            vec![
                (Semester::Ganjil, "2024/2025 - Ganjil".to_string()),
                (Semester::Genap, "2024/2025 - Genap".to_string()),
            ]
        );
    }

    #[test]
    fn test_start_year_out_of_range() {
        assert!(school_year_names(1999).is_err());
        assert!(school_year_names(2101).is_err());
        assert!(school_year_names(2100).is_ok());
    }
}
