//! 网关签名，均为小写十六进制 md5

/// 发起 inquiry 时的签名：merchant_code + order_id + amount + api_key
pub fn inquiry_signature(merchant_code: &str, order_id: &str, amount: i64, api_key: &str) -> String {
    let digest = md5::compute(format!("{merchant_code}{order_id}{amount}{api_key}"));
    format!("{digest:x}")
}

/// 回调签名：merchant_code + amount + order_id + api_key，amount 保持回调原文
pub fn callback_signature(merchant_code: &str, amount: &str, order_id: &str, api_key: &str) -> String {
    let digest = md5::compute(format!("{merchant_code}{amount}{order_id}{api_key}"));
    format!("{digest:x}")
}

pub fn verify_callback_signature(
    merchant_code: &str,
    amount: &str,
    order_id: &str,
    api_key: &str,
    signature: &str,
) -> bool {
    callback_signature(merchant_code, amount, order_id, api_key)
        .eq_ignore_ascii_case(signature.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_hex_format() {
        // md5("") 的已知值
        assert_eq!(format!("{:x}", md5::compute("")), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_field_order_differs() {
        let inquiry = inquiry_signature("D1234", "LK1", 50000, "key");
        let callback = callback_signature("D1234", "50000", "LK1", "key");
        assert_eq!(inquiry, format!("{:x}", md5::compute("D1234LK150000key")));
        assert_eq!(callback, format!("{:x}", md5::compute("D123450000LK1key")));
        assert_ne!(inquiry, callback);
    }

    #[test]
    fn test_verify_callback() {
        let sig = callback_signature("D1234", "50000", "LK1", "key");
        assert!(verify_callback_signature("D1234", "50000", "LK1", "key", &sig));
        assert!(verify_callback_signature(
            "D1234",
            "50000",
            "LK1",
            "key",
            &sig.to_uppercase()
        ));
        assert!(!verify_callback_signature("D1234", "50001", "LK1", "key", &sig));
        assert!(!verify_callback_signature("D1234", "50000", "LK1", "other", &sig));
    }
}
