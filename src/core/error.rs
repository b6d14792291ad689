/// Errors returned by network construction and mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FeistelError {
    /// No usable round policy: neither a round count nor a minimum average
    /// was given, both were, or the given value is zero.
    #[error("feistel: rounds must be set to a non zero value")]
    RoundsMustBeSet,
    /// The index cannot be mapped by this network.
    #[error("feistel: index {index} is outside the mappable range (max value {max_value})")]
    IndexOutOfRange { index: u64, max_value: u64 },
}
