//! Video sink backed by the system `ffmpeg` binary.

use std::io::Read;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::encoder::{FrameSink, SinkConfig};
use crate::encode::settings::ExportFormat;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::frame::FrameRGBA;

type Drain = JoinHandle<std::io::Result<Vec<u8>>>;

/// Streams raw RGBA frames into `ffmpeg` and collects the container from its stdout.
///
/// MP4 output is fragmented (`frag_keyframe+empty_moov`) so it can be written to a pipe.
pub struct FfmpegSink {
    format: ExportFormat,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_drain: Option<Drain>,
    stderr_drain: Option<Drain>,
    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
}

impl FfmpegSink {
    /// Sink for [`ExportFormat::Mp4`] or [`ExportFormat::Webm`].
    pub fn new(format: ExportFormat) -> ReelResult<Self> {
        if !format.is_video() {
            return Err(ReelError::unsupported_format(format!(
                "{format} is not a video format"
            )));
        }
        Ok(Self {
            format,
            child: None,
            stdin: None,
            stdout_drain: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
        })
    }

    fn codec_args(&self, cfg: &SinkConfig) -> Vec<String> {
        let q = cfg.quality.params();
        let args: &[&str] = match self.format {
            ExportFormat::Webm => &[
                "-c:v",
                "libvpx-vp9",
                "-pix_fmt",
                "yuv420p",
                "-b:v",
                "0",
                "-crf",
            ],
            _ => &["-c:v", "libx264", "-pix_fmt", "yuv420p", "-crf"],
        };
        let mut out: Vec<String> = args.iter().map(|s| (*s).to_owned()).collect();
        match self.format {
            ExportFormat::Webm => {
                out.push(q.vp9_crf.to_string());
                out.extend(["-f", "webm"].map(str::to_owned));
            }
            _ => {
                out.push(q.h264_crf.to_string());
                out.extend(
                    ["-movflags", "frag_keyframe+empty_moov", "-f", "mp4"].map(str::to_owned),
                );
            }
        }
        out
    }

    fn err(&self, msg: impl Into<String>) -> ReelError {
        ReelError::encoding(self.format, msg)
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if cfg.frame_rate == 0 {
            return Err(ReelError::validation("frame_rate must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ReelError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p output)",
            ));
        }
        if !is_ffmpeg_on_path() {
            return Err(self.err(format!(
                "ffmpeg is required for {} export, but was not found on PATH",
                self.format
            )));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Input: opaque RGBA8 frames (alpha flattened in push_frame).
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.frame_rate.to_string(),
            "-i",
            "pipe:0",
            "-an",
        ]);
        cmd.args(self.codec_args(&cfg));
        cmd.arg("pipe:1");
        tracing::debug!(format = %self.format, ?cmd, "spawning ffmpeg");

        let mut child = cmd
            .spawn()
            .map_err(|e| self.err(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.err("failed to open ffmpeg stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.err("failed to open ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| self.err("failed to open ffmpeg stderr"))?;

        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.stdout_drain = Some(drain(stdout));
        self.stderr_drain = Some(drain(stderr));
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRGBA, hold_ms: f64) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| self.err("ffmpeg sink not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(ReelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        let repeats = ((hold_ms / cfg.frame_duration_ms).round() as u64).max(1);
        let background = cfg.background;

        if frame.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, background)?;
        } else {
            self.scratch.copy_from_slice(&frame.data);
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::encoding(self.format, "ffmpeg sink is already finalized"));
        };
        use std::io::Write as _;
        for _ in 0..repeats {
            stdin.write_all(&self.scratch).map_err(|e| {
                ReelError::encoding(self.format, format!("failed to write frame to ffmpeg: {e}"))
            })?;
        }
        Ok(())
    }

    fn finish(&mut self) -> ReelResult<Vec<u8>> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| self.err("ffmpeg sink not started"))?;
        let status = child
            .wait()
            .map_err(|e| self.err(format!("failed to wait for ffmpeg: {e}")))?;
        let stdout = join_drain(self.stdout_drain.take()).map_err(|e| self.err(e))?;
        let stderr = join_drain(self.stderr_drain.take()).map_err(|e| self.err(e))?;
        self.cfg = None;

        if !status.success() {
            return Err(self.err(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        if stdout.is_empty() {
            return Err(self.err("ffmpeg produced no output"));
        }
        Ok(stdout)
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn drain<R: Read + Send + 'static>(mut r: R) -> Drain {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)?;
        Ok(bytes)
    })
}

fn join_drain(handle: Option<Drain>) -> Result<Vec<u8>, String> {
    match handle {
        Some(h) => h
            .join()
            .map_err(|_| "ffmpeg drain thread panicked".to_owned())?
            .map_err(|e| format!("ffmpeg pipe read failed: {e}")),
        None => Ok(Vec::new()),
    }
}

fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg: Rgba8,
) -> ReelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let (bg_r, bg_g, bg_b) = (u16::from(bg.r), u16::from(bg.g), u16::from(bg.b));
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        d[0] = (u16::from(s[0]) + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (u16::from(s[1]) + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (u16::from(s[2]) + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
