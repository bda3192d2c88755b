//! 关节索引和数组
//!
//! 提供编译期安全的关节索引，防止越界和索引错误。
//!
//! # 设计目标
//!
//! - **编译期安全**: 使用枚举防止无效索引
//! - **固定顺序**: 16 个关节按 index → middle → ring → thumb 排列，每指 4 个关节
//! - **只读名称表**: [`JOINT_NAMES`] 为进程级常量，构造后不可写
//!
//! # 示例
//!
//! ```rust
//! use allegro_protocol::{Joint, JointArray};
//!
//! let mut positions = JointArray::splat(0.0_f64);
//! positions[Joint::Thumb3] = 0.5;
//!
//! assert_eq!(positions[15], 0.5);
//! assert_eq!(Joint::Thumb3.name(), "thumb_joint_3");
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};

/// 自由度数量（关节数）
pub const DOF_JOINTS: usize = 16;

/// 规范关节名称表（与 URDF 一致）
pub const JOINT_NAMES: [&str; DOF_JOINTS] = [
    "index_joint_0",
    "index_joint_1",
    "index_joint_2",
    "index_joint_3",
    "middle_joint_0",
    "middle_joint_1",
    "middle_joint_2",
    "middle_joint_3",
    "ring_joint_0",
    "ring_joint_1",
    "ring_joint_2",
    "ring_joint_3",
    "thumb_joint_0",
    "thumb_joint_1",
    "thumb_joint_2",
    "thumb_joint_3",
];

/// 手指
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Finger {
    Index = 0,
    Middle = 1,
    Ring = 2,
    Thumb = 3,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Thumb];

    /// 该手指的 4 个关节
    pub const fn joints(self) -> [Joint; 4] {
        match self {
            Finger::Index => [Joint::Index0, Joint::Index1, Joint::Index2, Joint::Index3],
            Finger::Middle => [Joint::Middle0, Joint::Middle1, Joint::Middle2, Joint::Middle3],
            Finger::Ring => [Joint::Ring0, Joint::Ring1, Joint::Ring2, Joint::Ring3],
            Finger::Thumb => [Joint::Thumb0, Joint::Thumb1, Joint::Thumb2, Joint::Thumb3],
        }
    }
}

/// 关节枚举
///
/// 表示 Allegro Hand 的 16 个关节，枚举值即规范顺序中的索引。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Joint {
    Index0 = 0,
    Index1 = 1,
    Index2 = 2,
    Index3 = 3,
    Middle0 = 4,
    Middle1 = 5,
    Middle2 = 6,
    Middle3 = 7,
    Ring0 = 8,
    Ring1 = 9,
    Ring2 = 10,
    Ring3 = 11,
    Thumb0 = 12,
    Thumb1 = 13,
    Thumb2 = 14,
    Thumb3 = 15,
}

impl Joint {
    /// 所有关节（规范顺序）
    pub const ALL: [Joint; DOF_JOINTS] = [
        Joint::Index0,
        Joint::Index1,
        Joint::Index2,
        Joint::Index3,
        Joint::Middle0,
        Joint::Middle1,
        Joint::Middle2,
        Joint::Middle3,
        Joint::Ring0,
        Joint::Ring1,
        Joint::Ring2,
        Joint::Ring3,
        Joint::Thumb0,
        Joint::Thumb1,
        Joint::Thumb2,
        Joint::Thumb3,
    ];

    /// 获取关节索引（0-15）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 从索引创建关节（范围检查）
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 获取关节名称
    pub const fn name(self) -> &'static str {
        JOINT_NAMES[self.index()]
    }

    /// 所属手指
    pub const fn finger(self) -> Finger {
        match self.index() / 4 {
            0 => Finger::Index,
            1 => Finger::Middle,
            2 => Finger::Ring,
            _ => Finger::Thumb,
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 关节数组
///
/// 类型安全的 16 关节数组容器，支持索引、迭代和映射操作。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointArray<T> {
    data: [T; DOF_JOINTS],
}

// 如果 T 实现了 Copy，则 JointArray<T> 也实现 Copy
impl<T: Copy> Copy for JointArray<T> {}

impl<T> JointArray<T> {
    /// 创建新的关节数组
    #[inline]
    pub const fn new(data: [T; DOF_JOINTS]) -> Self {
        JointArray { data }
    }

    #[inline]
    pub fn as_array(&self) -> &[T; DOF_JOINTS] {
        &self.data
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> &mut [T; DOF_JOINTS] {
        &mut self.data
    }

    #[inline]
    pub fn into_array(self) -> [T; DOF_JOINTS] {
        self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// 映射转换
    pub fn map<U, F>(self, f: F) -> JointArray<U>
    where
        F: FnMut(T) -> U,
    {
        JointArray::new(self.data.map(f))
    }
}

impl<T: Copy> JointArray<T> {
    /// 创建所有元素相同的数组
    #[inline]
    pub const fn splat(value: T) -> Self {
        JointArray::new([value; DOF_JOINTS])
    }

    /// 按关节和另一个数组的元素执行映射
    pub fn map_with<U: Copy, V, F>(self, other: JointArray<U>, mut f: F) -> JointArray<V>
    where
        F: FnMut(T, U) -> V,
    {
        JointArray::new(std::array::from_fn(|i| f(self.data[i], other.data[i])))
    }
}

impl<T: Default + Copy> Default for JointArray<T> {
    fn default() -> Self {
        JointArray::splat(T::default())
    }
}

impl<T> Index<Joint> for JointArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, joint: Joint) -> &T {
        &self.data[joint.index()]
    }
}

impl<T> IndexMut<Joint> for JointArray<T> {
    #[inline]
    fn index_mut(&mut self, joint: Joint) -> &mut T {
        &mut self.data[joint.index()]
    }
}

impl<T> Index<usize> for JointArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for JointArray<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<T> From<[T; DOF_JOINTS]> for JointArray<T> {
    #[inline]
    fn from(data: [T; DOF_JOINTS]) -> Self {
        JointArray::new(data)
    }
}

impl<T> From<JointArray<T>> for [T; DOF_JOINTS] {
    #[inline]
    fn from(arr: JointArray<T>) -> Self {
        arr.data
    }
}

impl<T> IntoIterator for JointArray<T> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, DOF_JOINTS>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a JointArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut JointArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}

/// 关节标量向量（位置 rad、速度 rad/s、力矩）
pub type JointVector = JointArray<f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_index() {
        assert_eq!(Joint::Index0.index(), 0);
        assert_eq!(Joint::Middle0.index(), 4);
        assert_eq!(Joint::Thumb3.index(), 15);
    }

    #[test]
    fn test_joint_from_index() {
        assert_eq!(Joint::from_index(0), Some(Joint::Index0));
        assert_eq!(Joint::from_index(12), Some(Joint::Thumb0));
        assert_eq!(Joint::from_index(16), None);
    }

    #[test]
    fn test_joint_names_canonical_order() {
        let expected = [
            "index_joint_0",
            "index_joint_1",
            "index_joint_2",
            "index_joint_3",
            "middle_joint_0",
            "middle_joint_1",
            "middle_joint_2",
            "middle_joint_3",
            "ring_joint_0",
            "ring_joint_1",
            "ring_joint_2",
            "ring_joint_3",
            "thumb_joint_0",
            "thumb_joint_1",
            "thumb_joint_2",
            "thumb_joint_3",
        ];
        assert_eq!(JOINT_NAMES, expected);
        for (joint, name) in Joint::ALL.iter().zip(expected) {
            assert_eq!(joint.name(), name);
            assert_eq!(format!("{}", joint), name);
        }
    }

    #[test]
    fn test_joint_finger() {
        assert_eq!(Joint::Index3.finger(), Finger::Index);
        assert_eq!(Joint::Middle1.finger(), Finger::Middle);
        assert_eq!(Joint::Ring2.finger(), Finger::Ring);
        assert_eq!(Joint::Thumb0.finger(), Finger::Thumb);

        for finger in Finger::ALL {
            for joint in finger.joints() {
                assert_eq!(joint.finger(), finger);
            }
        }
    }

    #[test]
    fn test_joint_array_indexing() {
        let mut arr = JointArray::splat(0.0);
        arr[Joint::Ring1] = 1.5;
        assert_eq!(arr[9], 1.5);
        arr[0] = -1.0;
        assert_eq!(arr[Joint::Index0], -1.0);
    }

    #[test]
    fn test_joint_array_map() {
        let arr = JointArray::splat(2.0);
        let doubled = arr.map(|v| v * 2.0);
        assert!(doubled.iter().all(|&v| v == 4.0));
    }

    #[test]
    fn test_joint_array_map_with() {
        let a = JointArray::new(std::array::from_fn(|i| i as f64));
        let b = JointArray::splat(0.5);
        let c = a.map_with(b, |x, y| x * y);
        assert_eq!(c[Joint::Index1], 0.5);
        assert_eq!(c[Joint::Thumb3], 7.5);
    }

    #[test]
    fn test_joint_array_default_is_zero() {
        let arr: JointVector = JointArray::default();
        assert!(arr.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_into_array() {
        let data: [i32; DOF_JOINTS] = std::array::from_fn(|i| i as i32);
        let arr = JointArray::from(data);
        let back: [i32; DOF_JOINTS] = arr.into();
        assert_eq!(data, back);
    }
}
