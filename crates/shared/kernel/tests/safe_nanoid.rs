use ctn_kernel::SAFE_ALPHABET;
use ctn_kernel::safe_nanoid;

#[test]
fn generates_expected_length_and_charset() {
    let id = safe_nanoid!();
    assert_eq!(id.len(), 12);

    for ch in id.chars() {
        assert!(SAFE_ALPHABET.contains(&ch), "unexpected character in nanoid: {ch}");
    }
}

#[test]
fn prefixed_ids_keep_the_requested_length() {
    let id = format!("mem_{}", safe_nanoid!(16));
    assert!(id.starts_with("mem_"));
    assert_eq!(id.len(), 20);
}
