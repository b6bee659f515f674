pub mod hex;

#[macro_export]
macro_rules! print_hash {
    ($hash:expr) => {{
        let hash_str = $hash.iter().map(|byte| format!("{:02x}", byte)).collect::<String>();
        format!("{}...{}", &hash_str[..4], &hash_str[hash_str.len() - 4..])
    }};
}

#[cfg(test)]
mod tests {

    #[test]
    fn print_hash_truncates() {
        let hash = [0xABu8; 32];
        assert_eq!(print_hash!(hash), "abab...abab");
    }
}
