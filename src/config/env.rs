use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerHost,
    ServerPort,
    OutputDir,
    PipelineCommand,
    PipelineArgs,
    PipelineConfigPath,
    DeviceDit,
    DeviceVae,
    DeviceTextEmbedder,
    PipelineOffload,
    PipelineQuantizedTextEncoder,
    PipelineAttentionEngine,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerHost => "APP_HOST",
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::OutputDir => "OUTPUT_DIR",
            EnvKey::PipelineCommand => "PIPELINE_COMMAND",
            EnvKey::PipelineArgs => "PIPELINE_ARGS",
            EnvKey::PipelineConfigPath => "PIPELINE_CONFIG_PATH",
            EnvKey::DeviceDit => "DEVICE_DIT",
            EnvKey::DeviceVae => "DEVICE_VAE",
            EnvKey::DeviceTextEmbedder => "DEVICE_TEXT_EMBEDDER",
            EnvKey::PipelineOffload => "PIPELINE_OFFLOAD",
            EnvKey::PipelineQuantizedTextEncoder => "PIPELINE_QUANTIZED_TEXT_ENCODER",
            EnvKey::PipelineAttentionEngine => "PIPELINE_ATTENTION_ENGINE",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    parse_or(get(key).ok().as_deref(), default)
}

/// Whitespace separated list, empty when unset.
///
/// There is no quoting, so an argument containing spaces (a script path under
/// `My Models/`, say) cannot be expressed; point `PIPELINE_COMMAND` at a
/// wrapper script instead.
pub fn get_list(key: EnvKey) -> Vec<String> {
    get(key).map(|val| split_list(&val)).unwrap_or_default()
}

fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_reads_trimmed_values() {
        assert_eq!(parse_or(Some(" 9000 "), 8000u16), 9000);
        assert!(!parse_or(Some("false"), true));
    }

    #[test]
    fn parse_or_falls_back_on_missing_or_invalid() {
        assert_eq!(parse_or::<u16>(None, 8000), 8000);
        assert_eq!(parse_or(Some("eighty"), 8000u16), 8000);
        assert_eq!(parse_or(Some("70000"), 8000u16), 8000);
        assert!(parse_or(Some("yes"), true));
    }

    #[test]
    fn split_list_drops_extra_whitespace() {
        assert_eq!(split_list("  generate.py\t--fp16 "), vec!["generate.py", "--fp16"]);
        assert!(split_list("   ").is_empty());
    }
}
