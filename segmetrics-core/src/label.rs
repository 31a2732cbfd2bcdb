//! Label types accepted by the contingency builders.

use std::{fmt::Debug, sync::Arc};

use crate::{Result, error::MetricsError};

/// A label type with a distinguished background value.
///
/// The background marks unlabeled elements. Whether it takes part in a
/// comparison is decided by the table builder, not by the label type.
///
/// # Examples
/// ```
/// use segmetrics_core::BackgroundLabel;
///
/// assert_eq!(<u32 as BackgroundLabel>::BACKGROUND, 0);
/// assert!(0_u16.is_background());
/// assert!(!7_u64.is_background());
/// ```
pub trait BackgroundLabel: Copy + Ord + Debug {
    /// The sentinel used for unlabeled elements.
    const BACKGROUND: Self;

    /// Returns `true` when `self` is the background sentinel.
    #[must_use]
    fn is_background(&self) -> bool {
        *self == Self::BACKGROUND
    }
}

/// A label that can address a row or column of a dense table.
pub trait DenseLabel: BackgroundLabel + Send + Sync {
    /// Converts the label to a table index, if it fits the host.
    fn to_index(self) -> Option<usize>;
}

macro_rules! impl_labels {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl BackgroundLabel for $ty {
                const BACKGROUND: Self = 0;
            }

            impl DenseLabel for $ty {
                #[inline]
                fn to_index(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }
            }
        )+
    };
}

impl_labels!(u8, u16, u32, u64, usize, i32, i64);

/// Converts `label` to a dense index or reports it as unusable.
pub(crate) fn dense_index<L: DenseLabel>(label: L) -> Result<usize> {
    label.to_index().ok_or_else(|| MetricsError::LabelOutOfRange {
        label: Arc::from(format!("{label:?}")),
    })
}
