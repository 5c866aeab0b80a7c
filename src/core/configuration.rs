use serde::Deserialize;
use std::path::Path;
use tokio::{fs::File, io::AsyncReadExt};

use crate::core::filter::{SuppressionRule, DEFAULT_CALLER_FRAGMENT, DEFAULT_MESSAGE_FRAGMENT};

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Configuration {
    #[serde(default)]
    pub filter: FilterConfiguration,
    #[serde(default)]
    pub log: LogConfiguration,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct FilterConfiguration {
    pub message_fragment: Option<String>,
    pub caller_fragment: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct LogConfiguration {
    pub level: Option<String>,
    pub directory: Option<String>,
    pub retention: Option<usize>,
}

impl Configuration {
    /// Effective rule, falling back to the built-in fragments for anything
    /// the file leaves unset.
    pub fn suppression_rule(&self) -> SuppressionRule {
        SuppressionRule::new(
            self.filter
                .message_fragment
                .to_owned()
                .unwrap_or_else(|| DEFAULT_MESSAGE_FRAGMENT.to_string()),
            self.filter
                .caller_fragment
                .to_owned()
                .unwrap_or_else(|| DEFAULT_CALLER_FRAGMENT.to_string()),
        )
    }

    /// A blank fragment would turn the rule into "suppress everything",
    /// so explicitly configured blanks are rejected up front.
    pub fn assert_fragments_are_not_blank(&self) -> Result<(), &str> {
        let rule = self.suppression_rule();

        if rule.message_fragment().trim().is_empty() {
            return Err("filter.message_fragment cannot be blank");
        }

        if rule.caller_fragment().trim().is_empty() {
            return Err("filter.caller_fragment cannot be blank");
        }

        Ok(())
    }
}

pub async fn get_configuration(
    file_path: String,
) -> Result<Configuration, Box<dyn std::error::Error + Send + Sync>> {
    let path = Path::new(&file_path);

    if !path.exists() {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("configuration file is missing: {file_path}"),
        )));
    }

    let mut file = File::open(path).await?;
    let mut buffer = vec![];

    file.read_to_end(&mut buffer).await?;

    let result = String::from_utf8(buffer)?;

    let conf = toml::from_str::<Configuration>(&result)?;

    Ok(conf)
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use tokio::{
        fs::{self, File},
        io::AsyncWriteExt,
    };

    use crate::core::configuration::get_configuration;

    use super::{Configuration, FilterConfiguration, LogConfiguration};

    async fn create_sample_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if path.exists() {
            fs::remove_file(path)
                .await
                .expect("cannot remove sample configuration file");
        }

        let mut file = File::create(path)
            .await
            .expect("cannot create sample configuration file");
        let content = "[filter]
# records whose message contains this text are withheld from the sink
message_fragment = \"Cannot load configuration from stream\"

# the origin that additionally triggers the stdout echo of the parameters
caller_fragment = \"config_utils\"

[log]
level = \"Info\"
directory = \"./logs\"
retention = 31";

        file.write_all(content.as_bytes())
            .await
            .expect("cannot write to sample configuration file");
        file.shutdown().await?;

        Ok(())
    }

    #[tokio::test]
    async fn should_match_expected_values() {
        let path = Path::new("./test_conf.toml");

        create_sample_file(path).await.unwrap();

        let conf = get_configuration("./test_conf.toml".to_string())
            .await
            .expect("cannot load configuration");

        fs::remove_file(path)
            .await
            .expect("cannot cleanup sample configuration file");

        assert_eq!(
            "Cannot load configuration from stream",
            conf.filter.message_fragment.unwrap()
        );
        assert_eq!("config_utils", conf.filter.caller_fragment.unwrap());

        assert_eq!("Info", conf.log.level.unwrap());
        assert_eq!("./logs", conf.log.directory.unwrap());
        assert_eq!(31, conf.log.retention.unwrap());
    }

    #[tokio::test]
    async fn missing_sections_fall_back_to_defaults() {
        let path = Path::new("./test_conf_empty.toml");

        if path.exists() {
            fs::remove_file(path).await.unwrap();
        }

        let mut file = File::create(path).await.unwrap();
        file.write_all(b"").await.unwrap();
        file.shutdown().await.unwrap();

        let conf = get_configuration("./test_conf_empty.toml".to_string())
            .await
            .expect("cannot load configuration");

        fs::remove_file(path).await.unwrap();

        let rule = conf.suppression_rule();

        assert_eq!(
            "Cannot load configuration from stream",
            rule.message_fragment()
        );
        assert_eq!("config_utils", rule.caller_fragment());
        assert_eq!(true, conf.log.level.is_none());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let result = get_configuration("./nowhere_conf.toml".to_string()).await;

        assert_eq!(true, result.is_err());
    }

    #[test]
    fn assert_fragments_are_not_blank_tests() {
        let conf = Configuration {
            filter: FilterConfiguration {
                message_fragment: None,
                caller_fragment: None,
            },
            log: LogConfiguration {
                level: None,
                directory: None,
                retention: None,
            },
        };

        let conf2 = Configuration {
            filter: FilterConfiguration {
                message_fragment: Some(" ".to_string()),
                caller_fragment: None,
            },
            log: LogConfiguration {
                level: None,
                directory: None,
                retention: None,
            },
        };

        let conf3 = Configuration {
            filter: FilterConfiguration {
                message_fragment: Some("Cannot load".to_string()),
                caller_fragment: Some("".to_string()),
            },
            log: LogConfiguration {
                level: None,
                directory: None,
                retention: None,
            },
        };

        assert_eq!(true, conf.assert_fragments_are_not_blank().is_ok());
        assert_eq!(true, conf2.assert_fragments_are_not_blank().is_err());
        assert_eq!(true, conf3.assert_fragments_are_not_blank().is_err());
    }
}
