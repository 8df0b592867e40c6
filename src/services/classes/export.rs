//! 班级成绩总表（leger）导出
//!
//! 每个科目一组列，组内每种评估类型一列，单元格为该学生该类型分数的平均值。
//! 学生总平均取全部原始分数，空单元格不计入分母。

use std::collections::{BTreeMap, HashMap};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::{error, info};

use super::performance::round2;
use super::{ClassService, authorize_class};
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::classes::entities::Class;
use crate::models::grades::{entities::GradeRecord, requests::GradeListQuery};
use crate::models::students::entities::Student;
use crate::models::subjects::entities::Subject;
use crate::models::{ApiResponse, ErrorCode};

/// 一个科目的列组
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerColumnGroup {
    pub subject_id: i64,
    pub subject_name: String,
    pub assessment_types: Vec<String>,
}

/// 一个学生的行
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub name: String,
    pub nis: String,
    /// 按列组展开后的单元格，与 `LedgerMatrix::groups` 顺序一致
    pub cells: Vec<Option<f64>>,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerMatrix {
    pub groups: Vec<LedgerColumnGroup>,
    pub rows: Vec<LedgerRow>,
}

/// 汇总成绩矩阵
///
/// 评估类型按首次出现的日期排序；没有任何成绩的科目保留一个空列。
pub fn build_ledger_matrix(
    students: &[Student],
    subjects: &[Subject],
    grades: &[GradeRecord],
) -> LedgerMatrix {
    // (subject, assessment_type) -> 首次出现日期
    let mut first_seen: HashMap<(i64, &str), chrono::NaiveDate> = HashMap::new();
    // (student, subject, assessment_type) -> 分数
    let mut cell_scores: HashMap<(i64, i64, &str), Vec<f64>> = HashMap::new();
    let mut all_scores: HashMap<i64, Vec<f64>> = HashMap::new();

    for record in grades {
        let key = (record.subject_id, record.assessment_type.as_str());
        first_seen
            .entry(key)
            .and_modify(|d| *d = (*d).min(record.date))
            .or_insert(record.date);

        for entry in &record.scores {
            cell_scores
                .entry((entry.student_id, record.subject_id, record.assessment_type.as_str()))
                .or_default()
                .push(entry.score);
            all_scores.entry(entry.student_id).or_default().push(entry.score);
        }
    }

    let mut types_by_subject: BTreeMap<i64, Vec<(chrono::NaiveDate, &str)>> = BTreeMap::new();
    for ((subject_id, assessment_type), date) in &first_seen {
        types_by_subject
            .entry(*subject_id)
            .or_default()
            .push((*date, assessment_type));
    }

    let groups: Vec<LedgerColumnGroup> = subjects
        .iter()
        .map(|subject| {
            let mut types = types_by_subject.remove(&subject.id).unwrap_or_default();
            types.sort();
            LedgerColumnGroup {
                subject_id: subject.id,
                subject_name: subject.name.clone(),
                assessment_types: types.into_iter().map(|(_, t)| t.to_string()).collect(),
            }
        })
        .collect();

    let rows = students
        .iter()
        .map(|student| {
            let mut cells = Vec::new();
            for group in &groups {
                if group.assessment_types.is_empty() {
                    cells.push(None);
                    continue;
                }
                for assessment_type in &group.assessment_types {
                    let cell = cell_scores
                        .get(&(student.id, group.subject_id, assessment_type.as_str()))
                        .map(|scores| round2(scores.iter().sum::<f64>() / scores.len() as f64));
                    cells.push(cell);
                }
            }

            let average = all_scores
                .get(&student.id)
                .filter(|scores| !scores.is_empty())
                .map(|scores| round2(scores.iter().sum::<f64>() / scores.len() as f64));

            LedgerRow {
                name: student.name.clone(),
                nis: student.nis.clone(),
                cells,
                average,
            }
        })
        .collect();

    LedgerMatrix { groups, rows }
}

/// 导出成绩总表
pub async fn export_class_ledger(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 订阅等级随用户一起在请求上下文中
    let allowed = RequireJWT::extract_user_claims(request)
        .map(|u| u.is_pro() || u.is_admin())
        .unwrap_or(false);
    if !allowed {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ProTierRequired,
            "Ledger export requires the Pro plan",
        )));
    }

    let class = match authorize_class(&storage, request, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    let (students, grades, subjects, school_year) = tokio::join!(
        storage.list_students_by_class(class_id),
        storage.list_grades(GradeListQuery {
            class_id: Some(class_id),
            subject_id: None,
        }),
        storage.list_subjects(None),
        storage.get_active_school_year(),
    );

    let (students, grades, subjects, school_year) =
        match (students, grades, subjects, school_year) {
            (Ok(a), Ok(b), Ok(c), Ok(d)) => (a, b, c, d),
            (Err(e), ..) | (_, Err(e), ..) | (_, _, Err(e), _) | (.., Err(e)) => {
                return Ok(ApiResponse::from_error(&e, ErrorCode::ExportFailed));
            }
        };

    // 科目范围：班主任名下的科目加上本班已有成绩的科目
    let graded: std::collections::HashSet<i64> = grades.iter().map(|g| g.subject_id).collect();
    let subjects: Vec<Subject> = subjects
        .into_iter()
        .filter(|s| graded.contains(&s.id) || Some(s.teacher_id) == class.teacher_id)
        .collect();

    let matrix = build_ledger_matrix(&students, &subjects, &grades);
    let subtitle = format!(
        "Tahun Ajaran: {} | Dicetak: {}",
        school_year.map(|y| y.name).unwrap_or_else(|| "-".to_string()),
        crate::config::AppConfig::get()
            .school_now()
            .format("%d-%m-%Y %H:%M")
    );

    match generate_xlsx(&class, &subtitle, &matrix) {
        Ok(buffer) => {
            let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string();
            let filename = format!("leger_class_{class_id}_{timestamp}.xlsx");
            info!("Ledger for class {} exported ({} rows)", class_id, matrix.rows.len());

            Ok(HttpResponse::Ok()
                .content_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{filename}\""),
                ))
                .body(buffer))
        }
        Err(e) => {
            error!("Failed to generate ledger XLSX: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::ExportFailed, e.message())))
        }
    }
}

/// 生成 XLSX 文件
fn generate_xlsx(class: &Class, subtitle: &str, matrix: &LedgerMatrix) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let title_format = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center);
    let subtitle_format = Format::new().set_italic().set_align(FormatAlign::Center);
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new().set_border(FormatBorder::Thin);
    let number_format = Format::new()
        .set_border(FormatBorder::Thin)
        .set_num_format("0.##");

    let sheet = workbook.add_worksheet().set_name("Leger")?;
    write_ledger_sheet(
        sheet,
        class,
        subtitle,
        matrix,
        [&title_format, &subtitle_format, &header_format, &cell_format, &number_format],
    )?;

    Ok(workbook.save_to_buffer()?)
}

/// 表头两行：科目名（合并）与评估类型
fn write_ledger_sheet(
    sheet: &mut Worksheet,
    class: &Class,
    subtitle: &str,
    matrix: &LedgerMatrix,
    [title_format, subtitle_format, header_format, cell_format, number_format]: [&Format; 5],
) -> Result<()> {
    const HEADER_ROW: u32 = 3;
    const FIRST_DATA_COL: u16 = 3;

    let data_cols: usize = matrix
        .groups
        .iter()
        .map(|g| g.assessment_types.len().max(1))
        .sum();
    let average_col = FIRST_DATA_COL + data_cols as u16;

    sheet.merge_range(
        0,
        0,
        0,
        average_col,
        &format!("Leger Nilai Kelas {}", class.name),
        title_format,
    )?;
    sheet.merge_range(1, 0, 1, average_col, subtitle, subtitle_format)?;

    for (col, label) in ["No", "NIS", "Nama"].into_iter().enumerate() {
        sheet.merge_range(HEADER_ROW, col as u16, HEADER_ROW + 1, col as u16, label, header_format)?;
    }

    let mut col = FIRST_DATA_COL;
    for group in &matrix.groups {
        let width = group.assessment_types.len().max(1) as u16;
        if width > 1 {
            sheet.merge_range(
                HEADER_ROW,
                col,
                HEADER_ROW,
                col + width - 1,
                &group.subject_name,
                header_format,
            )?;
        } else {
            sheet.write_string_with_format(HEADER_ROW, col, &group.subject_name, header_format)?;
        }

        if group.assessment_types.is_empty() {
            sheet.write_string_with_format(HEADER_ROW + 1, col, "-", header_format)?;
        }
        for (offset, assessment_type) in group.assessment_types.iter().enumerate() {
            sheet.write_string_with_format(
                HEADER_ROW + 1,
                col + offset as u16,
                assessment_type,
                header_format,
            )?;
        }
        col += width;
    }
    sheet.merge_range(
        HEADER_ROW,
        average_col,
        HEADER_ROW + 1,
        average_col,
        "Rata-rata",
        header_format,
    )?;

    for (index, row) in matrix.rows.iter().enumerate() {
        let r = HEADER_ROW + 2 + index as u32;
        sheet.write_number_with_format(r, 0, (index + 1) as f64, cell_format)?;
        sheet.write_string_with_format(r, 1, &row.nis, cell_format)?;
        sheet.write_string_with_format(r, 2, &row.name, cell_format)?;

        for (offset, cell) in row.cells.iter().enumerate() {
            let c = FIRST_DATA_COL + offset as u16;
            match cell {
                Some(value) => sheet.write_number_with_format(r, c, *value, number_format)?,
                None => sheet.write_blank(r, c, cell_format)?,
            };
        }

        match row.average {
            Some(value) => sheet.write_number_with_format(r, average_col, value, number_format)?,
            None => sheet.write_blank(r, average_col, cell_format)?,
        };
    }

    sheet.set_column_width(0, 5)?;
    sheet.set_column_width(1, 14)?;
    sheet.set_column_width(2, 28)?;
    sheet.set_freeze_panes(HEADER_ROW + 2, FIRST_DATA_COL)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::entities::GradeEntry;
    use crate::models::students::entities::{Gender, StudentStatus};

    fn student(id: i64, name: &str) -> Student {
        let now = chrono::Utc::now();
        Student {
            id,
            name: name.into(),
            nis: format!("{:05}", id),
            class_id: 1,
            gender: Gender::P,
            status: StudentStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn subject(id: i64, name: &str) -> Subject {
        let now = chrono::Utc::now();
        Subject {
            id,
            name: name.into(),
            kkm: 75.0,
            teacher_id: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn grade(day: u32, subject_id: i64, kind: &str, scores: &[(i64, f64)]) -> GradeRecord {
        let now = chrono::Utc::now();
        GradeRecord {
            id: day as i64,
            date: chrono::NaiveDate::from_ymd_opt(2024, 8, day).unwrap(),
            class_id: 1,
            subject_id,
            assessment_type: kind.into(),
            teacher_id: 1,
            school_year_id: 1,
            scores: scores
                .iter()
                .map(|(student_id, score)| GradeEntry {
                    student_id: *student_id,
                    score: *score,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_two_scores_average_85() {
        let grades = vec![
            grade(1, 10, "Tugas Harian", &[(1, 80.0)]),
            grade(2, 10, "Tugas Harian", &[(1, 90.0)]),
        ];
        let matrix = build_ledger_matrix(
            &[student(1, "Ani")],
            &[subject(10, "Matematika")],
            &grades,
        );

        assert_eq!(matrix.groups[0].assessment_types, vec!["Tugas Harian"]);
        assert_eq!(matrix.rows[0].cells, vec![Some(85.0)]);
        assert_eq!(matrix.rows[0].average, Some(85.0));
    }

    #[test]
    fn test_blank_cells_excluded_from_average() {
        let grades = vec![
            grade(1, 10, "UTS", &[(1, 70.0), (2, 90.0)]),
            grade(3, 20, "Tugas Harian", &[(2, 60.0)]),
        ];
        let matrix = build_ledger_matrix(
            &[student(1, "Ani"), student(2, "Budi")],
            &[subject(10, "Matematika"), subject(20, "IPA")],
            &grades,
        );

        // Ani 在 IPA 没有成绩：空单元格，平均只算 70
        assert_eq!(matrix.rows[0].cells, vec![Some(70.0), None]);
        assert_eq!(matrix.rows[0].average, Some(70.0));
        assert_eq!(matrix.rows[1].average, Some(75.0));
    }

    #[test]
    fn test_assessment_types_ordered_by_first_date() {
        let grades = vec![
            grade(9, 10, "UAS", &[(1, 88.0)]),
            grade(2, 10, "Tugas Harian", &[(1, 70.0)]),
        ];
        let matrix = build_ledger_matrix(&[student(1, "Ani")], &[subject(10, "Matematika")], &grades);
        assert_eq!(
            matrix.groups[0].assessment_types,
            vec!["Tugas Harian".to_string(), "UAS".to_string()]
        );
    }

    #[test]
    fn test_subject_without_grades_keeps_blank_column() {
        let matrix = build_ledger_matrix(&[student(1, "Ani")], &[subject(30, "Seni")], &[]);
        assert!(matrix.groups[0].assessment_types.is_empty());
        assert_eq!(matrix.rows[0].cells, vec![None]);
        assert_eq!(matrix.rows[0].average, None);
    }

    #[test]
    fn test_generate_xlsx_produces_workbook() {
        let now = chrono::Utc::now();
        let class = Class {
            id: 1,
            name: "VII A".into(),
            teacher_id: Some(1),
            created_at: now,
            updated_at: now,
        };
        let grades = vec![grade(1, 10, "UTS", &[(1, 70.0)])];
        let matrix = build_ledger_matrix(&[student(1, "Ani")], &[subject(10, "Matematika")], &grades);
        let buffer = generate_xlsx(&class, "Tahun Ajaran: -", &matrix).unwrap();
        // XLSX 是 zip 包
        assert_eq!(&buffer[..2], b"PK");
    }
}
