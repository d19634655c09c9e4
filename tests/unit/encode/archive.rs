use super::*;
use std::io::Read as _;

fn cfg(quality: Quality) -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 2,
        frame_rate: 10,
        frame_duration_ms: 100.0,
        frame_count: 3,
        duration_ms: 300.0,
        quality,
        background: crate::foundation::core::Rgba8::rgb(0x000000),
    }
}

fn solid(px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: 4,
        height: 2,
        data: px.repeat(8),
        premultiplied: true,
    }
}

fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    archive.by_name(name).unwrap().read_to_end(&mut out).unwrap();
    out
}

#[test]
fn png_archive_holds_frames_and_manifest() {
    let mut sink = ArchiveSink::new(ArchiveImageFormat::Png);
    sink.begin(cfg(Quality::Medium)).unwrap();
    sink.push_frame(&solid([10, 20, 30, 255]), 200.0).unwrap();
    sink.push_frame(&solid([40, 50, 60, 255]), 100.0).unwrap();
    let bytes = sink.finish().unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 3);

    let manifest: ArchiveManifest =
        serde_json::from_slice(&read_entry(&mut archive, MANIFEST_NAME)).unwrap();
    assert_eq!(manifest.format, ArchiveImageFormat::Png);
    assert_eq!(manifest.frame_rate, 10);
    assert_eq!(manifest.frame_count, 2);
    assert_eq!((manifest.width, manifest.height), (4, 2));
    assert_eq!(manifest.duration_ms, 300.0);
    assert_eq!(manifest.quality, Quality::Medium);
    assert_eq!(manifest.frames[0].file, "frames/frame_000000.png");
    assert_eq!(manifest.frames[1].time_ms, 200.0);
    assert_eq!(manifest.frames[1].hold_ms, 100.0);

    let png = read_entry(&mut archive, "frames/frame_000001.png");
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(3, 1).0, [40, 50, 60, 255]);
}

#[test]
fn jpeg_frames_use_jpg_extension() {
    let mut sink = ArchiveSink::new(ArchiveImageFormat::Jpeg);
    sink.begin(cfg(Quality::Low)).unwrap();
    sink.push_frame(&solid([200, 200, 200, 255]), 300.0).unwrap();
    let bytes = sink.finish().unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let jpg = read_entry(&mut archive, "frames/frame_000000.jpg");
    assert_eq!(&jpg[..2], &[0xff, 0xd8]);
    let img = image::load_from_memory(&jpg).unwrap();
    assert_eq!((img.width(), img.height()), (4, 2));
}

#[test]
fn finish_requires_begin() {
    let mut sink = ArchiveSink::new(ArchiveImageFormat::Png);
    assert!(sink.finish().is_err());
    assert!(sink.push_frame(&solid([0, 0, 0, 255]), 1.0).is_err());
}
