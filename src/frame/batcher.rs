//! 绘制分桶器
//!
//! [`DrawBatcher`] 把一份剔除结果按渲染队列区间拆成三个桶并按桶内准则
//! 排序，向命令流发出有序绘制:
//!
//! - **Opaque**: 队列落在不透明区间的物体，按 [`RenderKey`]
//!   (批次键 + Front-to-Back 深度) 升序，利于状态合批与 Early-Z。
//! - **Skybox**: 无条件恰好一次，位于两桶之间。
//! - **Transparent**: 队列落在透明区间的物体，按深度 Back-to-Front
//!   降序，保证混合正确。
//!
//! 两个区间都不覆盖的物体本帧不绘制 —— 这是过滤约定，不是错误。

use crate::cull::CullingResult;
use crate::scene::drawable::{DrawableKey, RenderQueueRange};
use crate::stream::{CommandStream, DrawKind};

/// 渲染排序键 (Batch Key + Depth)
///
/// 不透明桶: 整键升序 —— 先按批次键聚合，再 Front-to-Back。
/// 透明桶: 仅深度位降序 —— Back-to-Front。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderKey(u64);

impl RenderKey {
    #[must_use]
    pub fn new(batch_key: u32, depth: f32) -> Self {
        let b_bits = u64::from(batch_key) << 30;
        let d_u32 = if depth.is_sign_negative() { 0 } else { depth.to_bits() >> 2 };
        let d_bits = u64::from(d_u32) & 0x3FFF_FFFF;
        Self(b_bits | d_bits)
    }

    /// 仅深度位（透明排序用）
    #[must_use]
    pub fn depth_bits(self) -> u64 {
        self.0 & 0x3FFF_FFFF
    }
}

/// 绘制分桶器
///
/// 持久化持有桶内存以跨帧复用，避免每帧分配。
pub struct DrawBatcher {
    opaque_range: RenderQueueRange,
    transparent_range: RenderQueueRange,
    /// 复用的桶内存
    opaque: Vec<(RenderKey, DrawableKey)>,
    transparent: Vec<(RenderKey, DrawableKey)>,
}

impl Default for DrawBatcher {
    fn default() -> Self {
        Self::new(RenderQueueRange::OPAQUE, RenderQueueRange::TRANSPARENT)
    }
}

impl DrawBatcher {
    #[must_use]
    pub fn new(opaque_range: RenderQueueRange, transparent_range: RenderQueueRange) -> Self {
        Self {
            opaque_range,
            transparent_range,
            opaque: Vec::with_capacity(512),
            transparent: Vec::with_capacity(128),
        }
    }

    /// 分桶并排序
    ///
    /// # 流程
    /// 1. 清空复用桶
    /// 2. 按队列区间分类（都不匹配则跳过）
    /// 3. 不透明升序 / 透明降序排序
    pub fn prepare(&mut self, culling: &CullingResult) {
        self.opaque.clear();
        self.transparent.clear();

        for item in &culling.visible {
            let key = RenderKey::new(item.batch_key, item.distance_sq);
            if self.opaque_range.contains(item.queue) {
                self.opaque.push((key, item.key));
            } else if self.transparent_range.contains(item.queue) {
                self.transparent.push((key, item.key));
            }
            // 区间外: 本帧不参与
        }

        self.opaque.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        self.transparent
            .sort_unstable_by(|a, b| b.0.depth_bits().cmp(&a.0.depth_bits()));
    }

    /// 发出不透明桶的绘制
    pub fn draw_opaque(&self, stream: &mut CommandStream) {
        for (_, key) in &self.opaque {
            stream.draw(DrawKind::Geometry(*key));
        }
    }

    /// 发出天空盒绘制（无条件恰好一次）
    pub fn draw_skybox(&self, stream: &mut CommandStream) {
        stream.draw(DrawKind::Skybox);
    }

    /// 发出透明桶的绘制
    pub fn draw_transparent(&self, stream: &mut CommandStream) {
        for (_, key) in &self.transparent {
            stream.draw(DrawKind::Geometry(*key));
        }
    }

    #[must_use]
    pub fn opaque_count(&self) -> usize {
        self.opaque.len()
    }

    #[must_use]
    pub fn transparent_count(&self) -> usize {
        self.transparent.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cull::{CullingResult, VisibleDrawable};
    use crate::scene::drawable::{queue, Drawable, DrawableWorld};
    use crate::stream::StreamOp;
    use glam::Vec3;

    fn visible(key: DrawableKey, queue: u16, batch_key: u32, distance_sq: f32) -> VisibleDrawable {
        VisibleDrawable { key, queue, batch_key, distance_sq }
    }

    fn keys() -> Vec<DrawableKey> {
        let mut world = DrawableWorld::new();
        (0..4)
            .map(|i| world.insert(Drawable::opaque(Vec3::ZERO, 1.0, i)))
            .collect()
    }

    #[test]
    fn partition_respects_queue_ranges() {
        let k = keys();
        let culling = CullingResult {
            visible: vec![
                visible(k[0], queue::GEOMETRY, 0, 1.0),
                visible(k[1], queue::TRANSPARENT, 0, 1.0),
                // 区间外（过滤约定）
                visible(k[2], 6000, 0, 1.0),
            ],
        };

        let mut batcher = DrawBatcher::default();
        batcher.prepare(&culling);
        assert_eq!(batcher.opaque_count(), 1);
        assert_eq!(batcher.transparent_count(), 1);
    }

    #[test]
    fn opaque_sorts_front_to_back_within_batch() {
        let k = keys();
        let culling = CullingResult {
            visible: vec![
                visible(k[0], queue::GEOMETRY, 7, 100.0),
                visible(k[1], queue::GEOMETRY, 7, 1.0),
            ],
        };

        let mut batcher = DrawBatcher::default();
        batcher.prepare(&culling);

        let mut stream = CommandStream::default();
        batcher.draw_opaque(&mut stream);
        assert_eq!(
            stream.ops(),
            &[
                StreamOp::Draw(DrawKind::Geometry(k[1])),
                StreamOp::Draw(DrawKind::Geometry(k[0])),
            ]
        );
    }

    #[test]
    fn opaque_groups_by_batch_key_before_depth() {
        let k = keys();
        let culling = CullingResult {
            visible: vec![
                visible(k[0], queue::GEOMETRY, 9, 1.0),
                visible(k[1], queue::GEOMETRY, 2, 100.0),
            ],
        };

        let mut batcher = DrawBatcher::default();
        batcher.prepare(&culling);

        let mut stream = CommandStream::default();
        batcher.draw_opaque(&mut stream);
        // 批次键 2 在前，即便它更远
        assert_eq!(
            stream.ops(),
            &[
                StreamOp::Draw(DrawKind::Geometry(k[1])),
                StreamOp::Draw(DrawKind::Geometry(k[0])),
            ]
        );
    }

    #[test]
    fn transparent_sorts_back_to_front() {
        let k = keys();
        let culling = CullingResult {
            visible: vec![
                visible(k[0], queue::TRANSPARENT, 0, 1.0),
                visible(k[1], queue::TRANSPARENT, 0, 100.0),
            ],
        };

        let mut batcher = DrawBatcher::default();
        batcher.prepare(&culling);

        let mut stream = CommandStream::default();
        batcher.draw_transparent(&mut stream);
        assert_eq!(
            stream.ops(),
            &[
                StreamOp::Draw(DrawKind::Geometry(k[1])),
                StreamOp::Draw(DrawKind::Geometry(k[0])),
            ]
        );
    }
}
