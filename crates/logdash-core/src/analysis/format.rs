/// Separator used by the dashboard when displaying totals
pub const THOUSANDS_SEPARATOR: char = '.';

/// Group the decimal digits of `n` in threes from the right
pub fn group_thousands(n: u64, separator: char) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, '.'), "0");
        assert_eq!(group_thousands(999, '.'), "999");
        assert_eq!(group_thousands(1000, '.'), "1.000");
        assert_eq!(group_thousands(123456, '.'), "123.456");
        assert_eq!(group_thousands(1234567, ','), "1,234,567");
        assert_eq!(group_thousands(u64::MAX, ','), "18,446,744,073,709,551,615");
    }
}
