use rand::Rng;
use rand::distr::Alphanumeric;

/// 激活码长度
pub const ACTIVATION_CODE_LEN: usize = 12;

/// 生成大写字母数字组成的随机码
pub fn generate_random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect()
}

/// 激活码，形如 `LK-XXXX-XXXX-XXXX`
pub fn generate_activation_code() -> String {
    let raw = generate_random_code(ACTIVATION_CODE_LEN);
    let groups: Vec<&str> = raw
        .as_bytes()
        .chunks(4)
        .filter_map(|c| std::str::from_utf8(c).ok())
        .collect();
    format!("LK-{}", groups.join("-"))
}

/// 商户订单号
pub fn generate_order_id() -> String {
    format!(
        "LK{}{}",
        chrono::Utc::now().format("%Y%m%d%H%M%S"),
        generate_random_code(6)
    )
}

/// 魔法链接登录码
pub fn generate_login_code() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_code_shape() {
        let code = generate_activation_code();
        assert_eq!(code.len(), 3 + ACTIVATION_CODE_LEN + 2);
        assert!(code.starts_with("LK-"));
        assert!(
            code[3..]
                .chars()
                .all(|c| c == '-' || c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_codes_differ() {
        assert_ne!(generate_activation_code(), generate_activation_code());
        assert_ne!(generate_login_code(), generate_login_code());
    }

    #[test]
    fn test_order_id_prefix() {
        let id = generate_order_id();
        assert!(id.starts_with("LK"));
        assert_eq!(id.len(), 2 + 14 + 6);
    }
}
