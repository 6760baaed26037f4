use crate::filename::is_bogus_camera;
use crate::filters;
use crate::metadata::FileMetadata;

/// Cross-check fields from a filename or a header and repair the usual
/// mix-ups between camera, filter and gain tokens.
///
/// The filter is left unset when nothing better than the broadband sentinel
/// can be found.
pub fn sanitize(mut meta: FileMetadata, file_name: &str, session_folder: &str) -> FileMetadata {
    if meta.camera.as_deref().is_some_and(is_bogus_camera) {
        meta.camera = None;
    }

    if let Some(camera) = meta.camera.take() {
        if filters::lookup_keyword(&camera).is_some() {
            if meta.filter.is_none() {
                meta.filter = Some(camera);
            }
        } else {
            meta.camera = Some(camera);
        }
    }

    if meta.filter.is_none() {
        meta.filter = filters::find_delimited(file_name).map(str::to_string);
    }

    // Known values pass through, anything else goes through the vocabulary.
    meta.filter = meta
        .filter
        .take()
        .and_then(|raw| {
            if filters::is_canonical(&raw) {
                Some(raw)
            } else {
                filters::resolve(&raw).map(str::to_string)
            }
        })
        .or_else(|| filters::resolve(session_folder).map(str::to_string));

    if meta
        .gain
        .as_deref()
        .is_some_and(|gain| !gain.chars().all(|c| c.is_ascii_digit()))
    {
        meta.gain = None;
    }

    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> FileMetadata {
        FileMetadata::default()
    }

    #[test]
    fn test_timestamp_camera_is_dropped() {
        let input = FileMetadata {
            camera: Some("20250405-214232".to_string()),
            ..meta()
        };
        let out = sanitize(input, "Light_x.fits", "2025-04-05");
        assert_eq!(out.camera, None);
    }

    #[test]
    fn test_gain_camera_is_dropped() {
        let input = FileMetadata {
            camera: Some("gain120".to_string()),
            ..meta()
        };
        assert_eq!(sanitize(input, "Light_x.fits", "2025-04-05").camera, None);
    }

    #[test]
    fn test_filter_keyword_in_camera_slot_moves_to_filter() {
        let input = FileMetadata {
            camera: Some("OIII".to_string()),
            ..meta()
        };
        let out = sanitize(input, "Light_x.fits", "2025-04-05");
        assert_eq!(out.camera, None);
        assert_eq!(out.filter.as_deref(), Some("OIII"));
    }

    #[test]
    fn test_filter_keyword_in_camera_slot_keeps_existing_filter() {
        let input = FileMetadata {
            camera: Some("ha".to_string()),
            filter: Some("SII".to_string()),
            ..meta()
        };
        let out = sanitize(input, "Light_x.fits", "2025-04-05");
        assert_eq!(out.camera, None);
        assert_eq!(out.filter.as_deref(), Some("SII"));
    }

    #[test]
    fn test_filter_from_delimited_filename_token() {
        let out = sanitize(meta(), "Light_M42_Bin1_PlayerOne_UVIR_gain456.fits", "2024-02-07");
        assert_eq!(out.filter.as_deref(), Some("UV/IR Cut"));
    }

    #[test]
    fn test_filename_filter_wins_over_session_folder() {
        let out = sanitize(
            meta(),
            "Light_M42_Bin1_PlayerOne_UVIR_gain456.fits",
            "2024-02-07 Backyard L-Extreme",
        );
        assert_eq!(out.filter.as_deref(), Some("UV/IR Cut"));
    }

    #[test]
    fn test_filter_from_session_folder() {
        let out = sanitize(meta(), "Light_M42_001.fits", "2024-02-07 Backyard UVIR");
        assert_eq!(out.filter.as_deref(), Some("UV/IR Cut"));
    }

    #[test]
    fn test_raw_filter_is_canonicalized() {
        let input = FileMetadata {
            filter: Some("L-Extreme".to_string()),
            ..meta()
        };
        let out = sanitize(input, "Light_x.fits", "2024-02-07");
        assert_eq!(out.filter.as_deref(), Some("L-eXtreme"));
    }

    #[test]
    fn test_unknown_filter_falls_back_to_session_then_unset() {
        let input = FileMetadata {
            filter: Some("Clear".to_string()),
            ..meta()
        };
        let out = sanitize(input.clone(), "Light_x.fits", "2024-02-07 oiii");
        assert_eq!(out.filter.as_deref(), Some("OIII"));

        let out = sanitize(input, "Light_x.fits", "2024-02-07");
        assert_eq!(out.filter, None);
    }

    #[test]
    fn test_non_numeric_gain_is_dropped() {
        let input = FileMetadata {
            gain: Some("120.5".to_string()),
            ..meta()
        };
        assert_eq!(sanitize(input, "Light_x.fits", "2024-02-07").gain, None);

        let input = FileMetadata {
            gain: Some("120".to_string()),
            ..meta()
        };
        assert_eq!(
            sanitize(input, "Light_x.fits", "2024-02-07").gain.as_deref(),
            Some("120")
        );
    }
}
