use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Execution provider string is empty or malformed.
    #[snafu(display("invalid execution provider: {provider:?}"))]
    InvalidProvider { provider: String },
}
