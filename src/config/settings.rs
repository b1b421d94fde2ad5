use crate::config::env::{self, EnvKey};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_PIPELINE_COMMAND: &str = "kandinsky-t2v";
pub const DEFAULT_PIPELINE_CONFIG: &str = "configs/k5_lite_t2v_5s_distil_sd.yaml";
pub const DEFAULT_DEVICE: &str = "cuda:0";

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub output_dir: PathBuf,
    pub pipeline: PipelineSettings,
}

/// How to launch the text-to-video model and which devices it runs on.
#[derive(Clone, Debug, Deserialize)]
pub struct PipelineSettings {
    pub command: String,
    /// Leading arguments, e.g. the script name when `command` is an interpreter.
    pub args: Vec<String>,
    pub config_path: PathBuf,
    pub device_map: DeviceMap,
    pub offload: bool,
    pub quantized_text_encoder: bool,
    pub attention_engine: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DeviceMap {
    pub dit: String,
    pub vae: String,
    pub text_embedder: String,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            server_host: env::get_or(EnvKey::ServerHost, "0.0.0.0"),
            server_port: env::get_parsed(EnvKey::ServerPort, DEFAULT_PORT),
            output_dir: PathBuf::from(env::get_or(EnvKey::OutputDir, DEFAULT_OUTPUT_DIR)),
            pipeline: PipelineSettings::new(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineSettings {
    pub fn new() -> Self {
        Self {
            command: env::get_or(EnvKey::PipelineCommand, DEFAULT_PIPELINE_COMMAND),
            args: env::get_list(EnvKey::PipelineArgs),
            config_path: PathBuf::from(env::get_or(
                EnvKey::PipelineConfigPath,
                DEFAULT_PIPELINE_CONFIG,
            )),
            device_map: DeviceMap {
                dit: env::get_or(EnvKey::DeviceDit, DEFAULT_DEVICE),
                vae: env::get_or(EnvKey::DeviceVae, DEFAULT_DEVICE),
                text_embedder: env::get_or(EnvKey::DeviceTextEmbedder, DEFAULT_DEVICE),
            },
            offload: env::get_parsed(EnvKey::PipelineOffload, true),
            quantized_text_encoder: env::get_parsed(EnvKey::PipelineQuantizedTextEncoder, true),
            attention_engine: env::get_or(EnvKey::PipelineAttentionEngine, "auto"),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::new()
    }
}
