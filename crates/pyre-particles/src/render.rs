//! Render hand-off: vertex packing and draw descriptions for an external renderer

use crate::data::ParticleData;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use pyre_core::Color;

/// Vertex layout shared by every render mode.
/// 20 bytes: position, texture coordinates in texture pixels, RGBA8 color.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [u8; 4],
}

/// Blend mode for particle rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleBlendMode {
    Alpha,
    Additive,
}

/// How the vertex buffer is to be assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// One vertex per particle
    Points,
    /// Four vertices per particle, clockwise from the top-left corner
    Quads,
}

/// Texture owned by the application; the core only reads its size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHandle {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

/// Full-screen pass that turns additively accumulated blobs into a flat
/// silhouette: texels with alpha above `threshold` become `color`, the rest
/// become transparent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdComposite {
    pub threshold: f32,
    pub color: Color,
}

impl Default for ThresholdComposite {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            color: Color::new(20, 50, 100, 255),
        }
    }
}

impl ThresholdComposite {
    /// CPU reference of the composite for one normalized RGBA texel
    pub fn apply(&self, texel: [f32; 4]) -> [f32; 4] {
        if texel[3] > self.threshold {
            self.color.to_f32_array()
        } else {
            Color::TRANSPARENT.to_f32_array()
        }
    }
}

/// Geometry and shading of a particle system
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderMode {
    Points,
    /// Quads textured with the whole texture
    Textured {
        texture: TextureHandle,
        additive: bool,
    },
    /// Quads textured with each particle's own texture region
    SpriteSheet { texture: TextureHandle },
    /// Additive quads rendered off-screen, then thresholded
    Metaball {
        texture: TextureHandle,
        composite: ThresholdComposite,
    },
}

impl RenderMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Textured { .. } => "textured",
            Self::SpriteSheet { .. } => "spritesheet",
            Self::Metaball { .. } => "metaball",
        }
    }

    pub fn primitive(&self) -> Primitive {
        match self {
            Self::Points => Primitive::Points,
            _ => Primitive::Quads,
        }
    }

    pub fn vertices_per_particle(&self) -> usize {
        match self.primitive() {
            Primitive::Points => 1,
            Primitive::Quads => 4,
        }
    }

    pub fn blend_mode(&self) -> ParticleBlendMode {
        match self {
            Self::Textured { additive: true, .. } | Self::Metaball { .. } => {
                ParticleBlendMode::Additive
            }
            _ => ParticleBlendMode::Alpha,
        }
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        match *self {
            Self::Points => None,
            Self::Textured { texture, .. }
            | Self::SpriteSheet { texture }
            | Self::Metaball { texture, .. } => Some(texture),
        }
    }

    pub fn composite(&self) -> Option<ThresholdComposite> {
        match *self {
            Self::Metaball { composite, .. } => Some(composite),
            _ => None,
        }
    }
}

/// Everything a renderer needs to draw one particle system for a frame
#[derive(Debug, Clone, Copy)]
pub struct RenderBatch<'a> {
    pub primitive: Primitive,
    pub blend_mode: ParticleBlendMode,
    pub texture: Option<TextureHandle>,
    /// Present in metaball mode: draw into an off-screen target first
    pub composite: Option<ThresholdComposite>,
    pub vertices: &'a [ParticleVertex],
}

/// Rewrite `out` with the alive particles of `data`
pub(crate) fn pack_vertices(mode: &RenderMode, data: &ParticleData, out: &mut Vec<ParticleVertex>) {
    out.clear();
    let alive = data.count_alive();

    if let RenderMode::Points = mode {
        out.extend((0..alive).map(|i| ParticleVertex {
            position: data.pos[i].to_array(),
            tex_coords: [0.0; 2],
            color: data.col[i].to_array(),
        }));
        return;
    }

    let whole = mode.texture().map(|t| {
        let (w, h) = (t.width as f32, t.height as f32);
        [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]]
    });

    for i in 0..alive {
        let center = data.pos[i];
        let half = data.size[i].current;
        let rotation = Vec2::from_angle(data.angle[i].current.to_radians());
        let color = data.col[i].to_array();

        let uv = match mode {
            RenderMode::SpriteSheet { .. } => {
                let r = data.tex_coords[i];
                let (l, t, rt, b) = (r.left as f32, r.top as f32, r.right() as f32, r.bottom() as f32);
                [[l, t], [rt, t], [rt, b], [l, b]]
            }
            _ => whole.unwrap_or_default(),
        };

        let corners = [
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ];
        for (corner, tex_coords) in corners.into_iter().zip(uv) {
            out.push(ParticleVertex {
                position: (center + rotation.rotate(corner)).to_array(),
                tex_coords,
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Tween;
    use pyre_core::IntRect;

    const TEX: TextureHandle = TextureHandle {
        id: 1,
        width: 32,
        height: 16,
    };

    fn one_particle() -> ParticleData {
        let mut data = ParticleData::new(2);
        data.pos[0] = Vec2::new(10.0, 20.0);
        data.size[0] = Tween::constant(2.0);
        data.col[0] = Color::new(1, 2, 3, 4);
        data.tex_coords[0] = IntRect::new(8, 0, 8, 8);
        data.wake(0);
        data
    }

    #[test]
    fn vertex_layout() {
        assert_eq!(std::mem::size_of::<ParticleVertex>(), 20);
        assert_eq!(std::mem::align_of::<ParticleVertex>(), 4);
    }

    #[test]
    fn points_emit_one_vertex_per_particle() {
        let mut out = Vec::new();
        pack_vertices(&RenderMode::Points, &one_particle(), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].position, [10.0, 20.0]);
        assert_eq!(out[0].color, [1, 2, 3, 4]);
    }

    #[test]
    fn textured_quad_spans_size_and_texture() {
        let mode = RenderMode::Textured {
            texture: TEX,
            additive: false,
        };
        let mut out = Vec::new();
        pack_vertices(&mode, &one_particle(), &mut out);
        assert_eq!(out.len(), 4);
        let expected = [[8.0, 18.0], [12.0, 18.0], [12.0, 22.0], [8.0, 22.0]];
        for (v, e) in out.iter().zip(expected) {
            assert!((Vec2::from(v.position) - Vec2::from(e)).length() < 1e-5);
        }
        assert_eq!(out[2].tex_coords, [32.0, 16.0]);
    }

    #[test]
    fn spritesheet_uses_particle_region() {
        let mut out = Vec::new();
        pack_vertices(&RenderMode::SpriteSheet { texture: TEX }, &one_particle(), &mut out);
        assert_eq!(out[0].tex_coords, [8.0, 0.0]);
        assert_eq!(out[2].tex_coords, [16.0, 8.0]);
    }

    #[test]
    fn quads_rotate_with_particle() {
        let mut data = one_particle();
        data.angle[0] = Tween::constant(90.0);
        let mut out = Vec::new();
        pack_vertices(&RenderMode::SpriteSheet { texture: TEX }, &data, &mut out);
        // Top-left corner (-2, -2) rotated 90 degrees is (2, -2)
        assert!((Vec2::from(out[0].position) - Vec2::new(12.0, 18.0)).length() < 1e-4);
    }

    #[test]
    fn metaball_is_additive_with_composite() {
        let mode = RenderMode::Metaball {
            texture: TEX,
            composite: ThresholdComposite::default(),
        };
        assert_eq!(mode.blend_mode(), ParticleBlendMode::Additive);
        assert_eq!(mode.primitive(), Primitive::Quads);
        assert!(mode.composite().is_some());
    }

    #[test]
    fn threshold_composite_replaces_dense_texels() {
        let pass = ThresholdComposite {
            threshold: 0.5,
            color: Color::new(255, 0, 0, 255),
        };
        assert_eq!(pass.apply([0.1, 0.1, 0.1, 0.6]), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(pass.apply([1.0, 1.0, 1.0, 0.5]), [0.0; 4]);
    }
}
