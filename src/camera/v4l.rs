//! V4L2 camera backend.
//!
//! Acquires a webcam through the `v4l` crate, negotiating MJPG (decoded via
//! the `image` crate) and falling back to YUYV with a BT.601 conversion.
//! Facing is advisory on V4L2 (the API carries no orientation), so the
//! first capture-capable node wins.

use std::io;

use image::{Rgb, RgbImage};
use tracing::{debug, info, instrument, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

use super::{CameraConstraints, CameraInfo, CameraProvider, CameraSource};
use crate::error::{BoothError, Result};

const MJPG: &[u8; 4] = b"MJPG";
const YUYV: &[u8; 4] = b"YUYV";

/// Frames discarded after stream start so auto-exposure can settle.
const WARMUP_FRAMES: usize = 2;

/// List capture-capable V4L2 devices.
///
/// Nodes that cannot be opened (e.g. metadata-only nodes) are skipped.
pub fn enumerate_devices() -> Vec<CameraInfo> {
    let mut cameras = Vec::new();
    for node in v4l::context::enum_devices() {
        let Ok(device) = Device::new(node.index()) else {
            continue;
        };
        let Ok(caps) = device.query_caps() else {
            continue;
        };
        if !caps
            .capabilities
            .contains(v4l::capability::Flags::VIDEO_CAPTURE)
        {
            continue;
        }
        let (width, height) = device
            .format()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0));
        cameras.push(CameraInfo {
            label: caps.card,
            device: node.path().display().to_string(),
            width,
            height,
        });
    }
    cameras
}

/// Classify a V4L2 I/O failure into the camera error taxonomy.
fn classify(err: &io::Error) -> BoothError {
    match err.raw_os_error() {
        // EPERM / EACCES
        Some(1 | 13) => BoothError::CameraPermissionDenied,
        // ENOENT / ENXIO / ENODEV
        Some(2 | 6 | 19) => BoothError::CameraNotFound,
        // EBUSY
        Some(16) => BoothError::CameraBusy,
        // EINTR
        Some(4) => BoothError::CameraAborted,
        _ => match err.kind() {
            io::ErrorKind::PermissionDenied => BoothError::CameraPermissionDenied,
            io::ErrorKind::NotFound => BoothError::CameraNotFound,
            io::ErrorKind::Interrupted => BoothError::CameraAborted,
            _ => BoothError::CameraUnknown {
                reason: err.to_string(),
            },
        },
    }
}

/// Acquisition capability backed by V4L2.
#[derive(Debug, Clone, Default)]
pub struct V4lProvider {
    /// Explicit device index; `None` picks the first capture-capable node.
    pub device_index: Option<usize>,
}

impl V4lProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_device(index: usize) -> Self {
        Self {
            device_index: Some(index),
        }
    }

    fn pick_index(&self) -> Result<usize> {
        if let Some(index) = self.device_index {
            return Ok(index);
        }
        v4l::context::enum_devices()
            .iter()
            .find(|node| {
                Device::new(node.index())
                    .and_then(|d| d.query_caps())
                    .map(|caps| {
                        caps.capabilities
                            .contains(v4l::capability::Flags::VIDEO_CAPTURE)
                    })
                    .unwrap_or(false)
            })
            .map(v4l::context::Node::index)
            .ok_or(BoothError::CameraNotFound)
    }
}

impl CameraProvider for V4lProvider {
    #[instrument(skip(self))]
    fn acquire(&self, constraints: &CameraConstraints) -> Result<Box<dyn CameraSource>> {
        let index = self.pick_index()?;
        let device = Device::new(index).map_err(|e| classify(&e))?;
        let caps = device.query_caps().map_err(|e| classify(&e))?;
        if !caps
            .capabilities
            .contains(v4l::capability::Flags::VIDEO_CAPTURE)
        {
            return Err(BoothError::CameraConstraintsUnsatisfiable);
        }

        // Prefer MJPG (cheap decode), fall back to YUYV. The driver answers
        // with what it actually set; anything else is unsatisfiable.
        let mut format = device.format().map_err(|e| classify(&e))?;
        format.width = constraints.ideal_width;
        format.height = constraints.ideal_height;
        format.fourcc = FourCC::new(MJPG);
        let mut negotiated = device.set_format(&format).map_err(|e| classify(&e))?;
        if negotiated.fourcc.repr != *MJPG {
            format.fourcc = FourCC::new(YUYV);
            negotiated = device.set_format(&format).map_err(|e| classify(&e))?;
            if negotiated.fourcc.repr != *YUYV {
                warn!(fourcc = ?negotiated.fourcc, "No supported pixel format");
                return Err(BoothError::CameraConstraintsUnsatisfiable);
            }
        }

        info!(
            index,
            card = %caps.card,
            width = negotiated.width,
            height = negotiated.height,
            fourcc = ?negotiated.fourcc,
            "Camera acquired"
        );

        Ok(Box::new(V4lCamera {
            info: CameraInfo {
                label: caps.card,
                device: format!("/dev/video{index}"),
                width: negotiated.width,
                height: negotiated.height,
            },
            fourcc: negotiated.fourcc,
            device: Some(device),
        }))
    }
}

/// A live V4L2 feed.
pub struct V4lCamera {
    info: CameraInfo,
    fourcc: FourCC,
    /// `None` after release.
    device: Option<Device>,
}

impl CameraSource for V4lCamera {
    fn info(&self) -> &CameraInfo {
        &self.info
    }

    fn is_live(&self) -> bool {
        self.device.is_some()
    }

    fn grab_frame(&mut self) -> Result<RgbImage> {
        let device = self.device.as_ref().ok_or(BoothError::CameraNotReady)?;

        let mut stream =
            Stream::with_buffers(device, Type::VideoCapture, 4).map_err(|e| classify(&e))?;
        for _ in 0..WARMUP_FRAMES {
            stream.next().map_err(|e| classify(&e))?;
        }
        let (buf, meta) = stream.next().map_err(|e| classify(&e))?;
        let used = (meta.bytesused as usize).min(buf.len());
        let data = &buf[..used];
        debug!(bytes = used, fourcc = ?self.fourcc, "Frame grabbed");

        if self.fourcc.repr == *MJPG {
            let decoded = image::load_from_memory(data)
                .map_err(|e| BoothError::ImageProcessing(e.to_string()))?;
            Ok(decoded.to_rgb8())
        } else {
            yuyv_to_rgb(data, self.info.width, self.info.height)
        }
    }

    fn release(&mut self) {
        if self.device.take().is_some() {
            info!(device = %self.info.device, "Camera released");
        }
    }
}

impl Drop for V4lCamera {
    fn drop(&mut self) {
        self.release();
    }
}

/// Convert a packed YUYV 4:2:2 buffer to RGB using ITU-R BT.601.
fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Result<RgbImage> {
    let expected = (width as usize) * (height as usize) * 2;
    if data.len() < expected {
        return Err(BoothError::ImageProcessing(format!(
            "short YUYV frame: {} of {expected} bytes",
            data.len()
        )));
    }

    let mut image = RgbImage::new(width, height);
    for (row, chunk_row) in data.chunks_exact(width as usize * 2).take(height as usize).enumerate() {
        for (pair, quad) in chunk_row.chunks_exact(4).enumerate() {
            let [y0, u, y1, v] = [quad[0], quad[1], quad[2], quad[3]];
            let x = (pair * 2) as u32;
            image.put_pixel(x, row as u32, Rgb(yuv_to_rgb(y0, u, v)));
            if x + 1 < width {
                image.put_pixel(x + 1, row as u32, Rgb(yuv_to_rgb(y1, u, v)));
            }
        }
    }
    Ok(image)
}

/// ITU-R BT.601 YUV -> RGB for one pixel.
#[allow(clippy::many_single_char_names)]
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y_f = f32::from(y);
    let u_f = f32::from(u) - 128.0;
    let v_f = f32::from(v) - 128.0;

    let r = 1.402f32.mul_add(v_f, y_f);
    let g = 0.714_14f32.mul_add(-v_f, 0.344_14f32.mul_add(-u_f, y_f));
    let b = 1.772f32.mul_add(u_f, y_f);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clamp = |val: f32| -> u8 { val.clamp(0.0, 255.0) as u8 };
    [clamp(r), clamp(g), clamp(b)]
}
