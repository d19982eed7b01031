use base64::{engine::general_purpose::STANDARD, Engine as _};
use openssl::{
    hash::MessageDigest,
    pkey::{PKey, Public},
    sign::Verifier,
};

use crate::errors::IapError;

/// Result of checking a receipt signature. Every way a check can fail
/// (undecodable signature, wrong key, corrupted data, primitive error) ends
/// up as `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignatureVerification {
    Valid,
    Invalid,
}

/// Wraps a bare Base64 public key (as shown in the Play Console) into PEM.
pub(crate) fn make_pem(public_key: &str) -> String {
    let mut pem = String::from("-----BEGIN PUBLIC KEY-----\n");
    for line in public_key.as_bytes().chunks(64) {
        pem.push_str(&String::from_utf8_lossy(line));
        pem.push('\n');
    }
    pem.push_str("-----END PUBLIC KEY-----");
    pem
}

pub(crate) fn load_public_key(api_key: &str) -> Result<PKey<Public>, IapError> {
    PKey::public_key_from_pem(make_pem(api_key.trim()).as_bytes()).map_err(|e| {
        tracing::debug!(error = %e, "failed to parse Google Play public key");
        IapError::configuration("Bad api key")
    })
}

/// Checks a Base64 SHA1withRSA signature over `data`.
pub(crate) fn verify_signature(
    public_key: &PKey<Public>,
    data: &[u8],
    signature: &str,
) -> SignatureVerification {
    let Ok(signature) = STANDARD.decode(signature.trim()) else {
        return SignatureVerification::Invalid;
    };
    let verified = Verifier::new(MessageDigest::sha1(), public_key).and_then(|mut verifier| {
        verifier.update(data)?;
        verifier.verify(&signature)
    });
    match verified {
        Ok(true) => SignatureVerification::Valid,
        Ok(false) => SignatureVerification::Invalid,
        Err(e) => {
            tracing::debug!(error = %e, "signature verification errored");
            SignatureVerification::Invalid
        }
    }
}
