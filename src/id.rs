//! Block id normalization
//!
//! Notion accepts block ids only in dashed UUID form, while ids copied out of
//! page URLs are usually 32 bare hex digits.

/// Lengths of the dash-separated groups in a canonical block id
const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// Number of hex digits in a block id
pub const BLOCK_ID_LEN: usize = 32;

/// Canonicalize a block id into `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`
///
/// All dashes are removed and then re-inserted at the fixed group offsets.
/// Hex content is not checked; pass the input through [`is_valid_block_id`]
/// first if it comes from an untrusted source. Inputs that are not 32 digits
/// long after dash removal produce malformed output but never panic.
///
/// ```
/// use notion_export::id::normalize;
///
/// assert_eq!(
///     normalize("abcdefabcdefabcdefabcdefabcdef12"),
///     "abcdefab-cdef-abcd-efab-cdefabcdef12"
/// );
/// ```
pub fn normalize(raw: &str) -> String {
    let bare: Vec<char> = raw.chars().filter(|c| *c != '-').collect();

    let mut out = String::with_capacity(BLOCK_ID_LEN + GROUPS.len() - 1);
    let mut offset = 0;
    for (i, len) in GROUPS.iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        // The last group takes whatever is left, as slicing past the end would
        let end = if i == GROUPS.len() - 1 {
            bare.len()
        } else {
            (offset + len).min(bare.len())
        };
        let start = offset.min(bare.len());
        out.extend(&bare[start..end]);
        offset += len;
    }
    out
}

/// Returns true if `raw` holds exactly 32 hex digits once dashes are removed
pub fn is_valid_block_id(raw: &str) -> bool {
    let mut count = 0;
    for c in raw.chars().filter(|c| *c != '-') {
        if !c.is_ascii_hexdigit() {
            return false;
        }
        count += 1;
    }
    count == BLOCK_ID_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_dashes_at_fixed_offsets() {
        assert_eq!(
            normalize("abcdefabcdefabcdefabcdefabcdef12"),
            "abcdefab-cdef-abcd-efab-cdefabcdef12"
        );
    }

    #[test]
    fn dashed_and_bare_forms_agree() {
        assert_eq!(
            normalize("abcdefabcdefabcdefabcdefabcdef12"),
            normalize("abcdefab-cdef-abcd-efab-cdefabcdef12")
        );
    }

    #[test]
    fn normalization_is_idempotent_regardless_of_dash_placement() {
        let inputs = [
            "0123456789abcdef0123456789ABCDEF",
            "01234567-89ab-cdef-0123-456789abcdef",
            "0-1-2-3456789abcdef0123456789abcdef",
            "0123456789abcdef0123456789abcdef----",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn preserves_case() {
        assert_eq!(
            normalize("ABCDEFABCDEFABCDEFABCDEFABCDEF12"),
            "ABCDEFAB-CDEF-ABCD-EFAB-CDEFABCDEF12"
        );
    }

    #[test]
    fn short_input_does_not_panic() {
        assert_eq!(normalize("abc"), "abc----");
        assert_eq!(normalize(""), "----");
    }

    #[test]
    fn long_input_keeps_tail_in_last_group() {
        assert_eq!(
            normalize("abcdefabcdefabcdefabcdefabcdef1234"),
            "abcdefab-cdef-abcd-efab-cdefabcdef1234"
        );
    }

    #[test]
    fn validity_requires_32_hex_digits() {
        assert!(is_valid_block_id("abcdefabcdefabcdefabcdefabcdef12"));
        assert!(is_valid_block_id("abcdefab-cdef-abcd-efab-cdefabcdef12"));
        assert!(is_valid_block_id("ABCDEFABCDEFABCDEFABCDEFABCDEF12"));
        assert!(!is_valid_block_id("abcdefabcdefabcdefabcdefabcdef1"));
        assert!(!is_valid_block_id("abcdefabcdefabcdefabcdefabcdef123"));
        assert!(!is_valid_block_id("zbcdefabcdefabcdefabcdefabcdef12"));
        assert!(!is_valid_block_id(""));
    }
}
