// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use dali_text::LayoutOptions;
use dali_text_atlas::{AtlasGlyphManager, AtlasRenderer, AtlasSlot};
use dali_text_dev::{TextSamples, DEFAULT_FONT};
use text_primitives::PixelFormat;

use crate::util::{glyph, multi_line, Pipeline};

fn slots(glyph_manager: &AtlasGlyphManager, text: &str) -> Vec<Option<AtlasSlot>> {
    text.chars()
        .map(|c| glyph_manager.is_cached(DEFAULT_FONT, glyph(c)))
        .collect()
}

#[test]
fn atlas_glyphs_are_shared_between_texts() {
    let first = Pipeline::new("abc", LayoutOptions::default());
    let second = Pipeline::new("bcd", LayoutOptions::default());
    let mut glyph_manager = AtlasGlyphManager::new();
    let mut first_renderer = AtlasRenderer::new();
    let mut second_renderer = AtlasRenderer::new();

    first
        .lay_out(100.0, 20.0)
        .render(&mut first_renderer, &mut glyph_manager);
    let before = slots(&glyph_manager, "bc");
    second
        .lay_out(100.0, 20.0)
        .render(&mut second_renderer, &mut glyph_manager);
    assert_eq!(slots(&glyph_manager, "bc"), before);
    assert_eq!(first.client.bitmaps_created(), 3);
    assert_eq!(second.client.bitmaps_created(), 1);
    assert_eq!(glyph_manager.state(DEFAULT_FONT, glyph('b')).reference_count(), 2);

    first_renderer.release(&mut glyph_manager);
    assert!(glyph_manager.is_cached(DEFAULT_FONT, glyph('a')).is_none());
    assert_eq!(glyph_manager.state(DEFAULT_FONT, glyph('c')).reference_count(), 1);

    second_renderer.release(&mut glyph_manager);
    assert_eq!(glyph_manager.metrics().glyph_count, 0);
}

#[test]
fn atlas_rendering_twice_is_stable() {
    let samples = TextSamples::new();
    let pipeline = Pipeline::new(samples.latin.text, multi_line());
    let laid = pipeline.lay_out(100.0, 1000.0);
    let mut glyph_manager = AtlasGlyphManager::new();
    let mut renderer = AtlasRenderer::new();

    let first = laid.render(&mut renderer, &mut glyph_manager);
    let before = glyph_manager.metrics();
    let cached = slots(&glyph_manager, samples.latin.text);
    let second = laid.render(&mut renderer, &mut glyph_manager);

    assert_eq!(first, second);
    assert_eq!(glyph_manager.metrics(), before);
    assert_eq!(slots(&glyph_manager, samples.latin.text), cached);
    renderer.release(&mut glyph_manager);
}

#[test]
fn atlas_glyphs_have_one_slot_each() {
    let samples = TextSamples::new();
    let mut glyph_manager = AtlasGlyphManager::new();
    let mut renderer = AtlasRenderer::new();

    for text in [samples.latin.text, samples.hebrew.text, samples.mixed.text, "Hello"] {
        let pipeline = Pipeline::new(text, multi_line());
        pipeline
            .lay_out(100.0, 1000.0)
            .render(&mut renderer, &mut glyph_manager);

        let mut image_ids: Vec<u32> = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .filter_map(|c| glyph_manager.is_cached(DEFAULT_FONT, glyph(c)))
            .map(|slot| slot.image_id.get())
            .collect();
        let metrics = glyph_manager.metrics();
        image_ids.sort_unstable();
        image_ids.dedup();
        assert_eq!(image_ids.len() as u32, metrics.glyph_count);
        assert_eq!(
            metrics.atlas_metrics.atlases[0].blocks_used,
            metrics.glyph_count,
            "every cached glyph takes exactly one block"
        );
    }
    renderer.release(&mut glyph_manager);
}

#[test]
fn atlas_pixels_hold_the_glyphs() {
    let pipeline = Pipeline::new("a", LayoutOptions::default());
    let mut glyph_manager = AtlasGlyphManager::new();
    let mut renderer = AtlasRenderer::new();
    pipeline
        .lay_out(100.0, 20.0)
        .render(&mut renderer, &mut glyph_manager);

    let slot = glyph_manager.is_cached(DEFAULT_FONT, glyph('a')).unwrap();
    let atlases = glyph_manager.atlas_manager();
    assert_eq!(atlases.pixel_format(slot.atlas_id), Some(PixelFormat::L8));
    let pixels = atlases.pixels(slot.atlas_id).unwrap();
    let width = atlases.atlas_size(slot.atlas_id).unwrap().width as usize;
    assert_eq!(pixels.len(), width * width);

    // Underlines sample the top-left pixel.
    assert_eq!(pixels[0], 0xff);
    // The first block starts at (1, 1) with a pixel of padding around the 10x8 glyph.
    assert_eq!(pixels[width + 1], 0);
    assert_eq!(pixels[2 * width + 2], 0xff);
    assert_eq!(pixels[9 * width + 11], 0xff);
    assert_eq!(pixels[2 * width + 12], 0);
    assert_eq!(pixels[10 * width + 2], 0);
    renderer.release(&mut glyph_manager);
}
