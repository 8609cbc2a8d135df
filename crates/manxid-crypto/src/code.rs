use rand::rngs::OsRng;
use rand::RngCore;

use manxid_core::ValidationCode;

/// Raw entropy per validation code.
pub const CODE_BYTES: usize = 16;

/// Generate a fresh validation code from the OS CSPRNG.
///
/// 128 bits of entropy keeps the collision probability negligible even
/// across large issuance volumes; callers still treat a store collision
/// as a signal to regenerate.
pub fn generate_validation_code() -> ValidationCode {
    let mut buf = [0u8; CODE_BYTES];
    OsRng.fill_bytes(&mut buf);
    ValidationCode::from_bytes(&buf)
}
