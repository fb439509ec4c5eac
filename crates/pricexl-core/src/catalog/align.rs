//! Pairing of page images with page records.

use std::path::PathBuf;

use tracing::warn;

use crate::error::AlignmentError;
use crate::models::config::AlignmentPolicy;
use crate::models::record::Record;

/// Attach a page's images to its records.
///
/// The catalog draws product images in the reverse order of the text rows,
/// so the image list is reversed and zipped onto the records from the
/// front. Records past the last image keep no image, and so does a record
/// whose slot is `None` (an image that was drawn but could not be saved).
/// Returns the number of records that received an image.
pub fn align_page(
    page: usize,
    records: &mut [Record],
    mut images: Vec<Option<PathBuf>>,
    policy: AlignmentPolicy,
) -> Result<usize, AlignmentError> {
    if images.len() > records.len() {
        let err = AlignmentError::SurplusImages {
            page,
            images: images.len(),
            records: records.len(),
        };
        match policy {
            AlignmentPolicy::Strict => return Err(err),
            AlignmentPolicy::Lenient => {
                warn!("{}, dropping the surplus", err);
            }
        }
    }

    images.reverse();
    let mut assigned = 0;
    for (record, image) in records.iter_mut().zip(images) {
        if image.is_some() {
            assigned += 1;
        }
        record.image_path = image;
    }

    Ok(assigned)
}
