//! PNG preview of a finished layout.
//!
//! World Y points up, image rows go down, so the layout is flipped vertically
//! while being fitted into the square canvas.

use std::path::Path;

use glam::{Vec2, Vec3};
use image::{Rgb, RgbImage};

use crate::constants::*;
use crate::error::Result;
use crate::geometry::Aabb;
use crate::layout::DungeonLayout;

fn color(rgb: Vec3) -> Rgb<u8> {
    let c = (rgb.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    Rgb([c.x as u8, c.y as u8, c.z as u8])
}

/// World to pixel mapping that keeps the aspect ratio
struct Viewport {
    origin: Vec2,
    scale: f32,
    size: u32,
    margin: u32,
}

impl Viewport {
    fn fit(bounds: Aabb, size: u32, margin: u32) -> Self {
        let usable = size.saturating_sub(2 * margin).max(1) as f32;
        let extent = bounds.size().max_element().max(1.0);
        Self {
            origin: bounds.min,
            scale: usable / extent,
            size,
            margin,
        }
    }

    fn to_pixel(&self, p: Vec2) -> Vec2 {
        let local = (p - self.origin) * self.scale;
        let flipped_y = (self.size - self.margin) as f32 - local.y;
        Vec2::new(self.margin as f32 + local.x, flipped_y)
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, px: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, px);
    }
}

fn fill_rect(img: &mut RgbImage, a: Vec2, b: Vec2, px: Rgb<u8>) {
    let min = a.min(b).round();
    let max = a.max(b).round();
    for y in min.y as i64..=max.y as i64 {
        for x in min.x as i64..=max.x as i64 {
            put(img, x, y, px);
        }
    }
}

fn draw_line(img: &mut RgbImage, a: Vec2, b: Vec2, px: Rgb<u8>) {
    let steps = (b - a).abs().max_element().ceil().max(1.0) as i64;
    for i in 0..=steps {
        let p = a.lerp(b, i as f32 / steps as f32).round();
        put(img, p.x as i64, p.y as i64, px);
    }
}

/// Draw rooms, spanning-tree edges and hallways into a `size` x `size` image.
pub fn render(layout: &DungeonLayout, size: u32, margin: u32) -> RgbImage {
    puffin::profile_function!();

    let mut img = RgbImage::from_pixel(size, size, Rgb(PREVIEW_BACKGROUND));
    let Some(bounds) = layout.bounds() else {
        return img;
    };
    let view = Viewport::fit(bounds, size, margin);

    {
        puffin::profile_scope!("render_rooms");
        for room in &layout.rooms {
            let fill = if room.is_main {
                PREVIEW_MAIN_ROOM
            } else {
                PREVIEW_ROOM
            };
            let b = room.bounds();
            fill_rect(&mut img, view.to_pixel(b.min), view.to_pixel(b.max), Rgb(fill));
        }
    }

    {
        puffin::profile_scope!("render_lines");
        let tree = color(TREE_LINE_COLOR);
        for c in &layout.connections {
            draw_line(&mut img, view.to_pixel(c.a), view.to_pixel(c.b), tree);
        }
        let hall = color(HALLWAY_LINE_COLOR);
        for h in &layout.hallways {
            for leg in [h.horizontal, h.vertical] {
                draw_line(&mut img, view.to_pixel(leg.start), view.to_pixel(leg.end), hall);
            }
        }
    }

    img
}

/// Render with the default preview size and write a PNG to `path`
pub fn save_preview(layout: &DungeonLayout, path: &Path) -> Result<()> {
    let img = render(layout, PREVIEW_SIZE, PREVIEW_MARGIN);
    img.save(path)?;
    log::info!("wrote preview to {}", path.display());
    Ok(())
}
