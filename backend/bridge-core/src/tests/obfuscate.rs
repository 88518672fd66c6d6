use crate::ASSET_SALT;
use crate::error::resource::ResourceError;
use crate::resource::obfuscate::{MAX_SALT_BYTES, PathObfuscator, encode_base85};

/// **VALUE**: Pins the token function to known outputs for the shipped salt.
///
/// **WHY THIS MATTERS**: The packager and the runtime provider must agree bit-for-bit.
/// Archives built before a refactor must keep resolving after it.
///
/// **BUG THIS CATCHES**: Would catch passing the salt as the BLAKE2b key, a different
/// digest length, a base85 alphabet typo, or dropping the `*`/`?` substitution.
#[test]
fn given_shipped_salt_when_tokenizing_known_paths_then_matches_reference_tokens() {
    // GIVEN: The obfuscator used for packaged builds
    let obfuscator = PathObfuscator::new(ASSET_SALT).unwrap();

    // WHEN/THEN: Known logical paths produce the reference tokens
    assert_eq!(obfuscator.token("assets/app.js"), "!z^IHsM%`&KPs+%jzHKb");
    assert_eq!(obfuscator.token("index.html"), "B]QdxuhTymMy=+Y`+q1-");
    assert_eq!(obfuscator.token(""), "4MDlIbc7TEZs!kGsQg!&");
}

/// **VALUE**: Verifies the salt actually changes the mapping.
///
/// **WHY THIS MATTERS**: An archive packed with one salt must be unreadable with another.
///
/// **BUG THIS CATCHES**: Would catch a builder that silently ignores the salt.
#[test]
fn given_different_salt_when_tokenizing_then_token_differs() {
    // GIVEN: Two obfuscators with different salts
    let shipped = PathObfuscator::new(ASSET_SALT).unwrap();
    let other = PathObfuscator::new(b"other-salt").unwrap();

    // WHEN: Tokenizing the same path
    let token = other.token("index.html");

    // THEN: Tokens differ and the other salt has its own reference value
    assert_ne!(token, shipped.token("index.html"));
    assert_eq!(token, "[;U}5%lRcH<lnQjB0eJz");
}

#[test]
fn given_same_path_when_tokenized_twice_then_identical_and_fixed_width() {
    // GIVEN: One obfuscator
    let obfuscator = PathObfuscator::new(ASSET_SALT).unwrap();

    // WHEN: Tokenizing repeatedly
    let first = obfuscator.token("assets/deep/nested/file.wasm");
    let second = obfuscator.token("assets/deep/nested/file.wasm");

    // THEN: Pure, 20 characters, URL-safe
    assert_eq!(first, second);
    assert_eq!(first.len(), 20);
    assert!(!first.contains('*') && !first.contains('?'));
    assert_ne!(first, obfuscator.token("assets/deep/nested/file.wasn"));
}

/// **VALUE**: Salts beyond BLAKE2b's 16-byte salt field are rejected up front.
///
/// **BUG THIS CATCHES**: Would catch truncating long salts, which would make two
/// different configured salts collide.
#[test]
fn given_oversized_salt_when_creating_obfuscator_then_invalid_salt_error() {
    // GIVEN: A 17-byte salt
    let salt = [7u8; 17];

    // WHEN: Creating the obfuscator
    let result = PathObfuscator::new(&salt);

    // THEN: InvalidSalt with the limits reported
    match result {
        Err(ResourceError::InvalidSalt { length, max, .. }) => {
            assert_eq!(length, 17);
            assert_eq!(max, MAX_SALT_BYTES);
        }
        other => panic!("Expected InvalidSalt, got {other:?}"),
    }
}

#[test]
fn given_known_bytes_when_base85_encoded_then_matches_rfc1924_alphabet() {
    // GIVEN: Reference inputs
    let counting: Vec<u8> = (0u8..16).collect();
    let saturated = [0xffu8; 16];

    // WHEN/THEN: Full groups encode to five digits each
    assert_eq!(encode_base85(&counting), "009C61O)~M2nh-c3=Iws");
    assert_eq!(encode_base85(&saturated), "|NsC0|NsC0|NsC0|NsC0");
    assert_eq!(encode_base85(&[]), "");
}

#[test]
fn given_partial_group_when_base85_encoded_then_output_is_trimmed_by_padding() {
    // GIVEN: 1, 2 and 3 trailing bytes
    // WHEN/THEN: Output length is len + ceil(len / 4)
    assert_eq!(encode_base85(&[0x00]).len(), 2);
    assert_eq!(encode_base85(&[0x00, 0x00]).len(), 3);
    assert_eq!(encode_base85(&[0x00, 0x00, 0x00]).len(), 4);
    assert_eq!(encode_base85(&[0x00]), "00");
}
