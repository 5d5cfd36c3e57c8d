//! Verification code generation.

use rand::Rng;

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Produces verification codes.
pub trait CodeGenerator: Send + Sync {
    /// Generate a new code of [`CODE_LENGTH`] decimal digits.
    fn generate(&self) -> String;
}

/// Draws each digit independently and uniformly from the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..CODE_LENGTH)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }
}
