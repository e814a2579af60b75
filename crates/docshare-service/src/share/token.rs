//! Share link token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::error;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;

/// Random bytes per token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Generates an opaque share token from the operating system CSPRNG.
///
/// The token is 43 characters of URL-safe base64 and carries no
/// metadata. If the OS source fails the call fails; there is no fallback
/// generator.
pub fn generate_token() -> AppResult<String> {
    generate_token_with(&mut OsRng)
}

/// Generates a token from the given random source.
pub fn generate_token_with<R: RngCore + ?Sized>(rng: &mut R) -> AppResult<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.try_fill_bytes(&mut bytes).map_err(|e| {
        error!(error = %e, "Secure random source unavailable");
        AppError::with_source(ErrorKind::Internal, "Failed to generate share token", e)
    })?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
