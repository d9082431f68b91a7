use arec_core::{ArecConfig, ConfigError};
use std::future::Future;

use crate::error::DataError;
use crate::handle::{Handle, Row};
use crate::statement::{Dialect, IdentifierPolicy, StatementBuilder};
use crate::value::Value;

/// Knobs for statement generation and load behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistOptions {
    pub identifiers: IdentifierPolicy,
    /// Fail a load whose key matches several rows instead of taking the first.
    pub strict_load: bool,
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self {
            identifiers: IdentifierPolicy::Raw,
            strict_load: true,
        }
    }
}

impl PersistOptions {
    /// Read `arec.data.quote` and `arec.data.strict`; missing keys keep the defaults.
    pub fn from_config(config: &ArecConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let quote = config.get_or("arec.data.quote", false)?;
        Ok(Self {
            identifiers: if quote {
                IdentifierPolicy::Quote
            } else {
                IdentifierPolicy::Raw
            },
            strict_load: config.get_or("arec.data.strict", defaults.strict_load)?,
        })
    }

    pub fn builder(&self, dialect: Dialect) -> StatementBuilder {
        StatementBuilder::new(dialect).identifier_policy(self.identifiers)
    }
}

/// A handle carrying explicit [`PersistOptions`].
///
/// ```ignore
/// let options = PersistOptions::from_config(&config)?;
/// let mut session = Session::new(&mut tx, options);
/// user.save(&mut session).await?;
/// ```
#[derive(Debug)]
pub struct Session<H> {
    handle: H,
    options: PersistOptions,
}

impl<H: Handle> Session<H> {
    pub fn new(handle: H, options: PersistOptions) -> Self {
        Self { handle, options }
    }

    pub fn into_inner(self) -> H {
        self.handle
    }

    pub fn get_mut(&mut self) -> &mut H {
        &mut self.handle
    }
}

impl<H: Handle> Handle for Session<H> {
    fn dialect(&self) -> Dialect {
        self.handle.dialect()
    }

    fn options(&self) -> PersistOptions {
        self.options
    }

    fn query(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Vec<Row>, DataError>> + Send {
        self.handle.query(sql, args)
    }

    fn query_one(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Row, DataError>> + Send {
        self.handle.query_one(sql, args)
    }

    fn exec(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<u64, DataError>> + Send {
        self.handle.exec(sql, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arec_core::ConfigValue;

    #[test]
    fn defaults_are_raw_and_strict() {
        let options = PersistOptions::from_config(&ArecConfig::empty()).unwrap();
        assert_eq!(options, PersistOptions::default());
        assert!(options.strict_load);
    }

    #[test]
    fn config_switches_quoting_and_relaxed_loads() {
        let config = ArecConfig::from_yaml_str(
            "arec:\n  data:\n    quote: true\n    strict: false\n",
            "test",
        )
        .unwrap();
        let options = PersistOptions::from_config(&config).unwrap();
        assert_eq!(options.identifiers, IdentifierPolicy::Quote);
        assert!(!options.strict_load);
    }

    #[test]
    fn env_style_strings_are_accepted() {
        let mut config = ArecConfig::empty();
        config.set("arec.data.strict", ConfigValue::String("no".into()));
        assert!(!PersistOptions::from_config(&config).unwrap().strict_load);
    }
}
