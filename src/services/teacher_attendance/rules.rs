//! 签到规则：设置校验与迟到判定

use chrono::NaiveTime;

use crate::models::teacher_attendance::entities::{AttendanceSettings, TeacherAttendanceStatus};
use crate::utils::geo::{haversine_distance, validate_coordinates, within_radius};
use crate::utils::validate::parse_hhmm;

/// 解析后的签到设置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: u32,
    pub check_in_start: NaiveTime,
    pub check_in_deadline: NaiveTime,
}

impl Geofence {
    pub fn distance_to(&self, latitude: f64, longitude: f64) -> f64 {
        haversine_distance(self.latitude, self.longitude, latitude, longitude)
    }

    pub fn contains(&self, distance_meters: f64) -> bool {
        within_radius(distance_meters, self.radius)
    }
}

pub fn validate_attendance_settings(settings: &AttendanceSettings) -> Result<Geofence, String> {
    let latitude: f64 = settings
        .latitude
        .trim()
        .parse()
        .map_err(|_| "Latitude must be a number".to_string())?;
    let longitude: f64 = settings
        .longitude
        .trim()
        .parse()
        .map_err(|_| "Longitude must be a number".to_string())?;
    validate_coordinates(latitude, longitude)?;

    if settings.radius == 0 {
        return Err("Radius must be greater than 0".to_string());
    }

    let check_in_start = parse_hhmm(&settings.check_in_start)?;
    let check_in_deadline = parse_hhmm(&settings.check_in_deadline)?;
    if check_in_start >= check_in_deadline {
        return Err("Check-in start must be earlier than the deadline".to_string());
    }

    Ok(Geofence {
        latitude,
        longitude,
        radius: settings.radius,
        check_in_start,
        check_in_deadline,
    })
}

/// 签到时间早于窗口开始返回 None；恰好在截止时间签到算准时
pub fn classify_check_in(
    time: NaiveTime,
    start: NaiveTime,
    deadline: NaiveTime,
) -> Option<TeacherAttendanceStatus> {
    if time < start {
        return None;
    }
    if time <= deadline {
        Some(TeacherAttendanceStatus::OnTime)
    } else {
        Some(TeacherAttendanceStatus::Late)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn settings() -> AttendanceSettings {
        AttendanceSettings {
            latitude: "-6.200000".to_string(),
            longitude: "106.816666".to_string(),
            radius: 100,
            check_in_start: "06:00".to_string(),
            check_in_deadline: "07:15".to_string(),
        }
    }

    #[test]
    fn test_valid_settings() {
        let fence = validate_attendance_settings(&settings()).unwrap();
        assert_eq!(fence.radius, 100);
        assert_eq!(fence.check_in_deadline, hm(7, 15, 0));
    }

    #[test]
    fn test_invalid_settings() {
        let mut s = settings();
        s.latitude = "91".to_string();
        assert!(validate_attendance_settings(&s).is_err());

        let mut s = settings();
        s.longitude = "east".to_string();
        assert!(validate_attendance_settings(&s).is_err());

        let mut s = settings();
        s.radius = 0;
        assert!(validate_attendance_settings(&s).is_err());

        let mut s = settings();
        s.check_in_start = "07:15".to_string();
        assert!(validate_attendance_settings(&s).is_err());

        let mut s = settings();
        s.check_in_deadline = "7:30".to_string();
        assert!(validate_attendance_settings(&s).is_err());
    }

    #[test]
    fn test_classify_boundaries() {
        let start = hm(6, 0, 0);
        let deadline = hm(7, 15, 0);

        assert_eq!(classify_check_in(hm(5, 59, 59), start, deadline), None);
        assert_eq!(
            classify_check_in(hm(6, 0, 0), start, deadline),
            Some(TeacherAttendanceStatus::OnTime)
        );
        assert_eq!(
            classify_check_in(hm(7, 15, 0), start, deadline),
            Some(TeacherAttendanceStatus::OnTime)
        );
        assert_eq!(
            classify_check_in(hm(7, 15, 1), start, deadline),
            Some(TeacherAttendanceStatus::Late)
        );
    }

    #[test]
    fn test_geofence_contains() {
        let fence = validate_attendance_settings(&settings()).unwrap();
        assert!(fence.contains(fence.distance_to(-6.2, 106.816666)));
        // 约 111 米
        assert!(!fence.contains(fence.distance_to(-6.201, 106.816666)));
    }
}
