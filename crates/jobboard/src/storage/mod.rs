pub mod media;

pub use media::{
    expand_upload_to, FileRef, MediaStorage, Upload, CV_UPLOAD_TO, LOGO_UPLOAD_TO,
    MAX_REFERENCE_LENGTH, RESUME_UPLOAD_TO,
};
