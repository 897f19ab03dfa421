/// Loads service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field `database_url` maps to env
/// var `DATABASE_URL`. Optional settings use `#[serde(default = "...")]`.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Same as [`Config::from_env`] but from an explicit variable list.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
