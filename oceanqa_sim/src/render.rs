//! Frame renderer: draws persisted frames as RGB sprites and saves them as PNG.
//!
//! Sprites are defined upright relative to the top-left corner of the
//! object's box and turned about the box centre for the other rotations.

use crate::error::{Result, SimError};
use crate::writer::{read_video, split_dirs, video_dirs};
use image::{ImageFormat, Rgb, RgbImage};
use oceanqa_core::definitions::FRAME_SIZE;
use oceanqa_core::{FrameRecord, ObjectClass, ObjectRecord, Rotation};
use std::path::Path;
use tracing::{debug, info, warn};

pub const BACKGROUND_RGB: [u8; 3] = [62, 193, 179];
pub const GREY_RGB: [u8; 3] = [122, 122, 122];
pub const BLACK_RGB: [u8; 3] = [0, 0, 0];

/// Colour slot of a sprite pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paint {
    Body,
    Grey,
    Black,
}

type Sprite = Vec<(i32, i32, Paint)>;

fn fill(sprite: &mut Sprite, xs: std::ops::Range<i32>, ys: std::ops::Range<i32>, paint: Paint) {
    for x in xs {
        for y in ys.clone() {
            sprite.push((x, y, paint));
        }
    }
}

fn octopus_sprite() -> Sprite {
    let mut s = Vec::new();
    fill(&mut s, 6..11, 0..1, Paint::Body);
    fill(&mut s, 5..12, 1..2, Paint::Body);
    fill(&mut s, 4..13, 2..12, Paint::Body);

    // Arms
    for i in 0..4 {
        let arms = [
            (i, 12 - i),
            (16 - i, 12 - i),
            (i, 15 - i),
            (16 - i, 15 - i),
            (2 + i, 16 - i),
            (14 - i, 16 - i),
        ];
        for (x, y) in arms {
            s.push((x, y, Paint::Body));
        }
    }
    for i in 0..3 {
        s.push((5 + i, 16 - i, Paint::Body));
        s.push((11 - i, 16 - i, Paint::Body));
    }
    for (x, y) in [(3, 10), (13, 10), (5, 12), (11, 12), (8, 12), (7, 13), (9, 13)] {
        s.push((x, y, Paint::Body));
    }

    for x in [6, 7, 9, 10] {
        s.push((x, 4, Paint::Black));
    }
    s
}

fn fish_sprite() -> Sprite {
    let mut s = Vec::new();
    fill(&mut s, 2..7, 1..8, Paint::Body);
    for (x, y) in [(4, 0), (0, 5), (1, 4), (7, 4), (8, 5)] {
        s.push((x, y, Paint::Body));
    }
    // Tail
    for (x, y) in [(4, 8), (3, 9), (2, 10), (5, 9), (6, 10)] {
        s.push((x, y, Paint::Body));
    }
    s.push((4, 2, Paint::Black));
    s
}

fn bag_sprite() -> Sprite {
    let mut s = Vec::new();
    fill(&mut s, 1..10, 6..14, Paint::Body);
    for i in 0..5 {
        s.push((1, 1 + i, Paint::Body));
        s.push((9, 1 + i, Paint::Body));
    }

    // Outline
    for i in 0..15 {
        s.push((0, i, Paint::Grey));
        s.push((10, i, Paint::Grey));
    }
    fill(&mut s, 0..11, 14..15, Paint::Grey);
    fill(&mut s, 2..9, 5..6, Paint::Grey);
    for i in 0..6 {
        s.push((2, i, Paint::Grey));
        s.push((8, i, Paint::Grey));
    }
    s.push((1, 0, Paint::Grey));
    s.push((9, 0, Paint::Grey));
    s
}

fn rock_sprite() -> Sprite {
    const DIAGONALS: [(i32, i32, i32); 12] = [
        (1, 6, 6),
        (1, 7, 7),
        (1, 8, 8),
        (1, 9, 9),
        (2, 9, 8),
        (2, 10, 9),
        (3, 10, 8),
        (4, 10, 7),
        (5, 10, 6),
        (6, 10, 5),
        (7, 10, 4),
        (8, 10, 3),
    ];

    let mut s = Vec::new();
    for (x, y, len) in DIAGONALS {
        for i in 0..len {
            s.push((x + i, y - i, Paint::Body));
        }
    }

    // Spots
    for (x, y) in [(2, 7), (3, 6), (7, 2), (6, 3), (7, 7), (6, 8), (8, 6)] {
        fill(&mut s, x..x + 2, y..y + 2, Paint::Grey);
    }

    // Outline
    for i in 0..7 {
        s.push((i, 6 - i, Paint::Grey));
        s.push((2 + i, 11, Paint::Grey));
        s.push((11, 2 + i, Paint::Grey));
    }
    for i in 0..4 {
        s.push((0, 6 + i, Paint::Grey));
        s.push((6 + i, 0, Paint::Grey));
    }
    for (x, y) in [(1, 10), (10, 1), (9, 10), (10, 9)] {
        s.push((x, y, Paint::Grey));
    }
    s
}

fn sprite(class: ObjectClass) -> Sprite {
    match class {
        ObjectClass::Octopus => octopus_sprite(),
        ObjectClass::Fish => fish_sprite(),
        ObjectClass::Bag => bag_sprite(),
        ObjectClass::Rock => rock_sprite(),
    }
}

/// Pivot for turning a sprite drawn at the box origin.
///
/// Boxes of non-square objects swap their sides when turned sideways, so the
/// pivot is shifted by half the side difference.
fn pivot(obj: &ObjectRecord) -> (i32, i32) {
    let [x1, y1, x2, y2]: [i32; 4] = obj.position.into();
    let mut x_centre = x1 + (x2 - x1) / 2;
    let mut y_centre = y1 + (y2 - y1) / 2;
    let diff = ((x2 - x1) - (y2 - y1)).abs();

    match obj.rotation {
        Rotation::Right => y_centre += diff / 2,
        Rotation::Left => x_centre -= diff / 2,
        Rotation::Up | Rotation::Down => {}
    }
    (x_centre, y_centre)
}

/// Canvas position of upright pixel `(x, y)` turned to `rotation` about `(cx, cy)`.
fn turn(x: i32, y: i32, rotation: Rotation, (cx, cy): (i32, i32)) -> (i32, i32) {
    let dx = cx - x;
    let dy = cy - y;
    match rotation {
        Rotation::Up => (x, y),
        Rotation::Right => (cx + dy, cy - dx),
        Rotation::Down => (cx + dx, cy + dy),
        Rotation::Left => (cx - dy, cy + dx),
    }
}

fn draw_object(img: &mut RgbImage, obj: &ObjectRecord) {
    let [x1, y1, _, _]: [i32; 4] = obj.position.into();
    let centre = pivot(obj);

    for (dx, dy, paint) in sprite(obj.class) {
        let (x, y) = turn(x1 + dx, y1 + dy, obj.rotation, centre);
        if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
            continue;
        }
        let rgb = match paint {
            Paint::Body => obj.colour.rgb(),
            Paint::Grey => GREY_RGB,
            Paint::Black => BLACK_RGB,
        };
        img.put_pixel(x as u32, y as u32, Rgb(rgb));
    }
}

/// Draws `frame` on a `size` x `size` canvas. Later objects paint over earlier ones.
pub fn render_frame(frame: &FrameRecord, size: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(size, size, Rgb(BACKGROUND_RGB));
    for obj in &frame.objects {
        draw_object(&mut img, obj);
    }
    img
}

/// Renders every frame of the video in `dir` next to its `video.json`.
pub fn render_video_dir(dir: &Path) -> Result<usize> {
    let record = read_video(dir)?;
    for (idx, frame) in record.frames.iter().enumerate() {
        render_frame(frame, FRAME_SIZE as u32)
            .save_with_format(dir.join(format!("frame_{}.png", idx)), ImageFormat::Png)?;
    }
    debug!("Rendered {} frames in {}", record.frames.len(), dir.display());
    Ok(record.frames.len())
}

/// Totals of one rendering pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub videos: usize,
    pub frames: usize,
    pub skipped: usize,
}

/// Renders every video under a dataset root (or a single split directory).
/// Video directories without `video.json` are skipped with a warning.
pub fn render_dataset(root: &Path) -> Result<RenderStats> {
    let mut stats = RenderStats::default();

    for split_dir in split_dirs(root) {
        for video_dir in video_dirs(&split_dir)? {
            match render_video_dir(&video_dir) {
                Ok(frames) => {
                    stats.videos += 1;
                    stats.frames += frames;
                }
                Err(SimError::MissingVideo(dir)) => {
                    warn!("No video.json found for {}", dir.display());
                    stats.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    info!(
        "Successfully created {} videos with {} total frames",
        stats.videos, stats.frames
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::write_split;
    use oceanqa_core::{BoundingBox, Colour, SceneConfig, Video, VideoRecord};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tempfile::tempdir;

    fn record(
        class: ObjectClass,
        x: i32,
        y: i32,
        colour: Colour,
        rotation: Rotation,
    ) -> ObjectRecord {
        let (w, h) = rotation.oriented(class.size());
        ObjectRecord {
            position: BoundingBox::from_origin(x, y, w, h),
            class,
            colour,
            rotation,
        }
    }

    fn pixel(img: &RgbImage, x: u32, y: u32) -> [u8; 3] {
        img.get_pixel(x, y).0
    }

    #[test]
    fn test_background_and_rock() {
        let frame = FrameRecord {
            objects: vec![record(ObjectClass::Rock, 100, 100, Colour::Blue, Rotation::Up)],
        };
        let img = render_frame(&frame, 256);

        assert_eq!(img.dimensions(), (256, 256));
        assert_eq!(pixel(&img, 0, 0), BACKGROUND_RGB);
        assert_eq!(pixel(&img, 101, 106), Colour::Blue.rgb());
        assert_eq!(pixel(&img, 100, 106), GREY_RGB);
    }

    #[test]
    fn test_octopus_eyes_follow_rotation() {
        let up = FrameRecord {
            objects: vec![record(ObjectClass::Octopus, 50, 50, Colour::Red, Rotation::Up)],
        };
        assert_eq!(pixel(&render_frame(&up, 256), 56, 54), BLACK_RGB);

        let down = FrameRecord {
            objects: vec![record(ObjectClass::Octopus, 50, 50, Colour::Red, Rotation::Down)],
        };
        let img = render_frame(&down, 256);
        assert_eq!(pixel(&img, 60, 62), BLACK_RGB);
        assert_ne!(pixel(&img, 56, 54), BLACK_RGB);
    }

    #[test]
    fn test_sprites_stay_inside_box() {
        for class in ObjectClass::ALL {
            for rotation in Rotation::ALL {
                let obj = record(class, 100, 100, Colour::OCTOPUS, rotation);
                let [x1, y1, x2, y2]: [i32; 4] = obj.position.into();
                let centre = pivot(&obj);
                for (dx, dy, _) in sprite(class) {
                    let (x, y) = turn(x1 + dx, y1 + dy, rotation, centre);
                    assert!(x >= x1 - 1 && x <= x2 + 1, "{} {:?} x={}", class, rotation, x);
                    assert!(y >= y1 - 1 && y <= y2 + 1, "{} {:?} y={}", class, rotation, y);
                }
            }
        }
    }

    #[test]
    fn test_objects_near_edge_are_clipped() {
        let frame = FrameRecord {
            objects: vec![record(ObjectClass::Bag, 250, 250, Colour::BAG, Rotation::Left)],
        };
        let img = render_frame(&frame, 256);
        assert_eq!(pixel(&img, 0, 0), BACKGROUND_RGB);
    }

    #[test]
    fn test_render_dataset_writes_pngs() {
        let dir = tempdir().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let scene = SceneConfig {
            num_frames: 3,
            ..SceneConfig::default()
        };
        let rec = VideoRecord::from(&Video::simulate(&scene, &mut rng).unwrap());
        write_split(&dir.path().join("train"), &[rec]).unwrap();
        std::fs::create_dir_all(dir.path().join("train/1")).unwrap();

        let stats = render_dataset(dir.path()).unwrap();
        assert_eq!(stats, RenderStats { videos: 1, frames: 3, skipped: 1 });

        let img = image::open(dir.path().join("train/0/frame_2.png")).unwrap();
        assert_eq!((img.width(), img.height()), (256, 256));
    }
}
