//! End-to-end envelope tests, including documents produced by OpenSSL.

use base64::Engine;
use kuvert_core::{algorithm, Error};
use kuvert_crypto::{cipher, keytransport};
use kuvert_enc::{
    decrypt, decrypt_to_bytes, encrypt, parser, DecryptOptions, EncryptOptions, EnvelopeBuilder,
    InputEncoding,
};

const PUBLIC_KEY: &str = include_str!("../../../test-data/keys/rsa-public.pem");
const PRIVATE_KEY: &str = include_str!("../../../test-data/keys/rsa-private.pem");
const OTHER_KEY: &str = include_str!("../../../test-data/keys/other-private.pem");
const CERT: &str = include_str!("../../../test-data/keys/rsa-cert.pem");

const PLAIN: &str = include_str!("../../../test-data/enc/plain.txt");
const AES_OAEP: &str = include_str!("../../../test-data/enc/aes256-cbc-rsa-oaep.xml");
const TDES_PKCS1: &str = include_str!("../../../test-data/enc/tripledes-cbc-rsa-1_5.xml");

fn encrypt_options() -> EncryptOptions {
    EncryptOptions::new()
        .with_public_key(PUBLIC_KEY)
        .with_certificate(CERT)
        .with_default_algorithms()
}

fn decrypt_options() -> DecryptOptions {
    DecryptOptions::new().with_private_key(PRIVATE_KEY)
}

fn b64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Assemble an envelope by hand, for algorithms `encrypt` refuses to produce.
fn manual_envelope(content_uri: &str, key_wrap_uri: &str, content_key: &[u8], payload: &[u8]) -> String {
    let public_key = kuvert_keys::load_rsa_public_pem(PUBLIC_KEY.as_bytes()).unwrap();
    let wrapped = keytransport::from_uri(key_wrap_uri)
        .unwrap()
        .wrap(&public_key, content_key)
        .unwrap();
    let cert = kuvert_keys::pem_to_cert(CERT).unwrap();

    let builder = EnvelopeBuilder::new();
    let key_info = builder.build_key_info(&b64(&wrapped), &cert, key_wrap_uri).unwrap();
    builder.build_encrypted_data(&b64(payload), &key_info, content_uri).unwrap()
}

#[test]
fn aes_round_trip() {
    let content = "<saml:Assertion ID=\"_1\">caf\u{e9}</saml:Assertion>";
    let xml = encrypt(content, &encrypt_options()).unwrap();
    assert!(!xml.contains("saml:Assertion"));
    assert_eq!(decrypt(&xml, &decrypt_options()).unwrap(), content);
}

#[test]
fn empty_content_round_trip() {
    let xml = encrypt("", &encrypt_options()).unwrap();
    let parsed = parser::parse(&xml).unwrap();
    assert_eq!(parsed.content_cipher.len(), 32);
    assert_eq!(decrypt(&xml, &decrypt_options()).unwrap(), "");
}

#[test]
fn latin1_content_round_trip() {
    let opts = encrypt_options().with_input_encoding(InputEncoding::Latin1);
    let xml = encrypt("caf\u{e9}", &opts).unwrap();
    assert_eq!(decrypt_to_bytes(&xml, &decrypt_options()).unwrap(), b"caf\xe9");
}

#[test]
fn fresh_key_and_iv_per_call() {
    let a = parser::parse(&encrypt("same", &encrypt_options()).unwrap()).unwrap();
    let b = parser::parse(&encrypt("same", &encrypt_options()).unwrap()).unwrap();
    assert_ne!(a.content_cipher[..16], b.content_cipher[..16]);
    assert_ne!(a.content_cipher, b.content_cipher);
    assert_ne!(a.wrapped_key, b.wrapped_key);
}

#[test]
fn openssl_aes256_oaep_in_saml_response() {
    assert_eq!(decrypt(AES_OAEP, &decrypt_options()).unwrap(), PLAIN);
}

#[test]
fn openssl_tripledes_pkcs1() {
    let parsed = parser::parse(TDES_PKCS1).unwrap();
    assert_eq!(parsed.content_uri, algorithm::TRIPLEDES_CBC);
    assert_eq!(parsed.key_wrap_uri, algorithm::RSA_PKCS1);
    assert_eq!(decrypt(TDES_PKCS1, &decrypt_options()).unwrap(), PLAIN);
}

#[test]
fn tripledes_legacy_envelope() {
    let key = [0x5au8; 24];
    let payload = cipher::from_uri(algorithm::TRIPLEDES_CBC)
        .unwrap()
        .encrypt(&key, b"legacy payload")
        .unwrap();
    let xml = manual_envelope(algorithm::TRIPLEDES_CBC, algorithm::RSA_PKCS1, &key, &payload);
    assert_eq!(decrypt(&xml, &decrypt_options()).unwrap(), "legacy payload");
}

#[test]
fn longer_unwrapped_key_fails() {
    let key = [0x11u8; 48];
    let payload = cipher::from_uri(algorithm::AES256_CBC)
        .unwrap()
        .encrypt(&key[..32], b"x")
        .unwrap();
    let xml = manual_envelope(algorithm::AES256_CBC, algorithm::RSA_OAEP, &key, &payload);
    assert!(matches!(decrypt(&xml, &decrypt_options()), Err(Error::DecryptionFailed)));
}

/// `IV ‖ 3DES(block)` with no padding added, so the last plaintext byte is
/// whatever `block` ends with.
fn tripledes_raw_payload(key: &[u8], block: &[u8; 8]) -> Vec<u8> {
    use cbc::cipher::block_padding::NoPadding;
    use cbc::cipher::{BlockEncryptMut, KeyIvInit};

    let iv = [0x24u8; 8];
    let enc = cbc::Encryptor::<des::TdesEde3>::new_from_slices(key, &iv).unwrap();
    let mut payload = iv.to_vec();
    payload.extend(enc.encrypt_padded_vec_mut::<NoPadding>(block));
    payload
}

#[test]
fn tripledes_out_of_range_pad_byte_returns_whole_buffer_as_text() {
    let key = [0x5au8; 24];
    for last in [0u8, 9, 255] {
        let mut block = *b"abcdefg\0";
        block[7] = last;
        let payload = tripledes_raw_payload(&key, &block);
        let xml = manual_envelope(algorithm::TRIPLEDES_CBC, algorithm::RSA_PKCS1, &key, &payload);

        assert_eq!(decrypt_to_bytes(&xml, &decrypt_options()).unwrap(), block);
        let text = decrypt(&xml, &decrypt_options()).unwrap();
        assert_eq!(text, String::from_utf8_lossy(&block), "last byte {last}");
        assert!(text.starts_with("abcdefg"));
    }
}

#[test]
fn tripledes_in_range_pad_byte_is_stripped() {
    let key = [0x5au8; 24];
    let payload = tripledes_raw_payload(&key, b"abcde\x01\x02\x03");
    let xml = manual_envelope(algorithm::TRIPLEDES_CBC, algorithm::RSA_PKCS1, &key, &payload);
    assert_eq!(decrypt(&xml, &decrypt_options()).unwrap(), "abcde");
}

#[test]
fn shorter_unwrapped_key_fails() {
    let xml = manual_envelope(algorithm::AES256_CBC, algorithm::RSA_OAEP, &[1u8; 16], &[0u8; 32]);
    assert!(matches!(decrypt(&xml, &decrypt_options()), Err(Error::DecryptionFailed)));
}

#[test]
fn ciphertext_shorter_than_iv() {
    let xml = manual_envelope(algorithm::AES256_CBC, algorithm::RSA_OAEP, &[1u8; 32], &[0u8; 5]);
    assert!(matches!(
        decrypt(&xml, &decrypt_options()),
        Err(Error::MalformedCiphertext(_))
    ));
}

#[test]
fn wrong_private_key() {
    let opts = DecryptOptions::new().with_private_key(OTHER_KEY);
    assert!(matches!(decrypt(AES_OAEP, &opts), Err(Error::DecryptionFailed)));
}

#[test]
fn missing_cipher_value() {
    let xml = encrypt("x", &encrypt_options()).unwrap();
    let start = xml.rfind("<xenc:CipherValue>").unwrap();
    let end = xml.rfind("</xenc:CipherValue>").unwrap() + "</xenc:CipherValue>".len();
    let stripped = format!("{}{}", &xml[..start], &xml[end..]);
    assert!(matches!(
        decrypt(&stripped, &decrypt_options()),
        Err(Error::MalformedEnvelope(_))
    ));
}

#[test]
fn unsupported_algorithms_fail_before_key_material() {
    let opts = EncryptOptions::new()
        .with_public_key("garbage")
        .with_certificate("garbage")
        .with_key_wrap_algorithm(algorithm::RSA_OAEP)
        .with_content_algorithm("http://www.w3.org/2009/xmlenc11#aes256-gcm");
    assert!(matches!(encrypt("x", &opts), Err(Error::UnsupportedAlgorithm(_))));

    let xml = AES_OAEP.replace(algorithm::RSA_OAEP, "http://www.w3.org/2009/xmlenc11#rsa-oaep");
    let opts = DecryptOptions::new().with_private_key("garbage");
    assert!(matches!(decrypt(&xml, &opts), Err(Error::UnsupportedAlgorithm(_))));
}

#[test]
fn algorithm_kind_is_enforced() {
    let opts = encrypt_options().with_content_algorithm(algorithm::RSA_OAEP);
    assert!(matches!(encrypt("x", &opts), Err(Error::UnsupportedAlgorithm(_))));
}

#[test]
fn missing_configuration() {
    let opts = EncryptOptions::new().with_certificate(CERT);
    assert!(matches!(
        encrypt("x", &opts),
        Err(Error::MissingConfiguration("public_key"))
    ));
    assert!(matches!(
        decrypt(AES_OAEP, &DecryptOptions::new()),
        Err(Error::MissingConfiguration("private_key"))
    ));
}
