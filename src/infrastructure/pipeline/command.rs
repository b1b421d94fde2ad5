use super::{GenerationJob, PipelineError, VideoPipeline};
use crate::config::settings::PipelineSettings;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

/// Drives the model's command line entry point, one process per job.
#[derive(Debug, Clone)]
pub struct CommandPipeline {
    program: PathBuf,
    base_args: Vec<String>,
}

impl CommandPipeline {
    /// Checks that the model can be launched at all. Called once at startup;
    /// any error here is fatal.
    pub fn load(settings: &PipelineSettings) -> Result<Self, PipelineError> {
        if !settings.config_path.is_file() {
            return Err(PipelineError::ConfigNotFound(settings.config_path.clone()));
        }

        let program = resolve_executable(&settings.command)
            .ok_or_else(|| PipelineError::ExecutableNotFound(settings.command.clone()))?;

        let mut base_args = settings.args.clone();
        base_args.extend([
            "--conf-path".to_string(),
            settings.config_path.display().to_string(),
            "--dit-device".to_string(),
            settings.device_map.dit.clone(),
            "--vae-device".to_string(),
            settings.device_map.vae.clone(),
            "--text-embedder-device".to_string(),
            settings.device_map.text_embedder.clone(),
            "--attention-engine".to_string(),
            settings.attention_engine.clone(),
        ]);
        if settings.offload {
            base_args.push("--offload".to_string());
        }
        if settings.quantized_text_encoder {
            base_args.push("--quantized-qwen".to_string());
        }

        info!(
            "✨ Pipeline loaded: {} (config {}, offload={}, quantized={}, attention={})",
            program.display(),
            settings.config_path.display(),
            settings.offload,
            settings.quantized_text_encoder,
            settings.attention_engine
        );

        Ok(Self { program, base_args })
    }

    fn command_for(&self, job: &GenerationJob) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args)
            .arg("--prompt")
            .arg(&job.prompt)
            .arg("--time-length")
            .arg(job.duration_secs.to_string())
            .arg("--width")
            .arg(job.width.to_string())
            .arg("--height")
            .arg(job.height.to_string())
            .arg("--save-path")
            .arg(&job.save_path)
            .stdin(Stdio::null());
        cmd
    }
}

impl VideoPipeline for CommandPipeline {
    fn generate(&self, job: &GenerationJob) -> Result<(), PipelineError> {
        // A leftover from a same-second job must not pass the output check below.
        match fs::remove_file(&job.save_path) {
            Ok(()) => warn!("Replacing existing artifact {}", job.save_path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(PipelineError::Failed(format!(
                    "cannot replace {}: {}",
                    job.save_path.display(),
                    e
                )));
            }
        }

        debug!("Launching {} for {}", self.program.display(), job.save_path.display());

        let output = self
            .command_for(job)
            .output()
            .map_err(PipelineError::Spawn)?;

        if !output.status.success() {
            return Err(PipelineError::Failed(failure_message(
                output.status,
                &output.stderr,
            )));
        }

        if !job.save_path.is_file() {
            return Err(PipelineError::Failed(format!(
                "pipeline exited without writing {}",
                job.save_path.display()
            )));
        }

        Ok(())
    }
}

/// Last non-empty stderr line, which is where Python puts the exception.
fn failure_message(status: ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    match stderr.lines().rev().map(str::trim).find(|line| !line.is_empty()) {
        Some(line) => line.to_string(),
        None => format!("pipeline exited with {status}"),
    }
}

fn resolve_executable(command: &str) -> Option<PathBuf> {
    let candidate = Path::new(command);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(command))
        .find(|path| path.is_file())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::settings::DeviceMap;
    use tempfile::TempDir;

    const WRITES_SAVE_PATH: &str = r#"
while [ $# -gt 0 ]; do
  case "$1" in
    --save-path) printf 'mp4' > "$2"; shift ;;
  esac
  shift
done
"#;

    fn settings_for(dir: &TempDir, script: &str) -> PipelineSettings {
        let config_path = dir.path().join("model.yaml");
        fs::write(&config_path, "model: test\n").unwrap();
        let script_path = dir.path().join("pipeline.sh");
        fs::write(&script_path, script).unwrap();

        PipelineSettings {
            command: "sh".to_string(),
            args: vec![script_path.display().to_string()],
            config_path,
            device_map: DeviceMap {
                dit: "cpu".to_string(),
                vae: "cpu".to_string(),
                text_embedder: "cpu".to_string(),
            },
            offload: true,
            quantized_text_encoder: false,
            attention_engine: "auto".to_string(),
        }
    }

    fn job_in(dir: &TempDir) -> GenerationJob {
        GenerationJob {
            prompt: "a red fox running through snow".to_string(),
            duration_secs: 5,
            width: 512,
            height: 512,
            save_path: dir.path().join("vid_1700000000.mp4"),
        }
    }

    #[test]
    fn load_fails_without_config_file() {
        let dir = TempDir::new().unwrap();
        let mut settings = settings_for(&dir, WRITES_SAVE_PATH);
        settings.config_path = dir.path().join("missing.yaml");

        let err = CommandPipeline::load(&settings).unwrap_err();
        assert!(matches!(err, PipelineError::ConfigNotFound(_)));
    }

    #[test]
    fn load_fails_for_unknown_executable() {
        let dir = TempDir::new().unwrap();
        let mut settings = settings_for(&dir, WRITES_SAVE_PATH);
        settings.command = "definitely-not-a-video-model".to_string();

        let err = CommandPipeline::load(&settings).unwrap_err();
        assert!(matches!(err, PipelineError::ExecutableNotFound(_)));
    }

    #[test]
    fn load_passes_device_map_and_flags() {
        let dir = TempDir::new().unwrap();
        let pipeline = CommandPipeline::load(&settings_for(&dir, WRITES_SAVE_PATH)).unwrap();

        assert!(pipeline.base_args.windows(2).any(|w| w == ["--dit-device", "cpu"]));
        assert!(pipeline.base_args.contains(&"--offload".to_string()));
        assert!(!pipeline.base_args.contains(&"--quantized-qwen".to_string()));
    }

    #[test]
    fn generate_writes_video_at_save_path() {
        let dir = TempDir::new().unwrap();
        let pipeline = CommandPipeline::load(&settings_for(&dir, WRITES_SAVE_PATH)).unwrap();
        let job = job_in(&dir);

        pipeline.generate(&job).unwrap();
        assert!(job.save_path.is_file());
    }

    #[test]
    fn generate_reports_last_stderr_line_on_failure() {
        let dir = TempDir::new().unwrap();
        let script = "echo 'Traceback (most recent call last):' >&2\necho 'RuntimeError: CUDA out of memory' >&2\nexit 1\n";
        let pipeline = CommandPipeline::load(&settings_for(&dir, script)).unwrap();

        let err = pipeline.generate(&job_in(&dir)).unwrap_err();
        assert_eq!(err.to_string(), "RuntimeError: CUDA out of memory");
    }

    #[test]
    fn generate_fails_when_no_file_was_written() {
        let dir = TempDir::new().unwrap();
        let pipeline = CommandPipeline::load(&settings_for(&dir, "exit 0\n")).unwrap();

        let err = pipeline.generate(&job_in(&dir)).unwrap_err();
        assert!(err.to_string().starts_with("pipeline exited without writing"));
    }

    #[test]
    fn stale_artifact_with_same_name_does_not_count_as_output() {
        let dir = TempDir::new().unwrap();
        let pipeline = CommandPipeline::load(&settings_for(&dir, "exit 0\n")).unwrap();
        let job = job_in(&dir);
        fs::write(&job.save_path, b"previous video").unwrap();

        let err = pipeline.generate(&job).unwrap_err();
        assert!(err.to_string().starts_with("pipeline exited without writing"));
        assert!(!job.save_path.exists());
    }

    #[test]
    fn same_name_rerun_overwrites_previous_artifact() {
        let dir = TempDir::new().unwrap();
        let pipeline = CommandPipeline::load(&settings_for(&dir, WRITES_SAVE_PATH)).unwrap();
        let job = job_in(&dir);
        fs::write(&job.save_path, b"previous video").unwrap();

        pipeline.generate(&job).unwrap();
        assert_eq!(fs::read(&job.save_path).unwrap(), b"mp4");
    }
}
