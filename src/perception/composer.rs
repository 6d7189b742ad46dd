//! Deterministic prompt composition from an aggregated image analysis

use std::fmt::Write;

use crate::models::ImageAnalysis;

/// Render an [`ImageAnalysis`] into the description-generation prompt.
///
/// Pure function: no capability calls, no side effects, identical input
/// always yields the identical prompt. The text and faces sections are
/// included only when non-empty.
#[must_use]
pub fn compose_description_prompt(analysis: &ImageAnalysis) -> String {
    let detected_objects = analysis
        .labels
        .iter()
        .map(|label| format!("{} (confidence: {:.1}%)", label.name, label.confidence))
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "The following elements were detected in a photo:\n\nObjects: {detected_objects}"
    );

    if !analysis.text_lines.is_empty() {
        let _ = writeln!(
            prompt,
            "\nText in the photo: {}",
            analysis.text_lines.join(", ")
        );
    }

    if !analysis.faces.is_empty() {
        let face_details = analysis
            .faces
            .iter()
            .map(|face| {
                format!(
                    "{}, age {}-{}, emotions: {}",
                    face.gender,
                    face.age_low,
                    face.age_high,
                    face.emotions.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("; ");
        let _ = writeln!(prompt, "\nFaces: {face_details}");
    }

    prompt.push_str(
        r#"
Based on the data above, please generate:
1. A detailed description of the photo (3-5 sentences)
2. A list of 5-10 appropriate tags for this photo

Format the response as JSON:
{
    "description": "Photo description...",
    "tags": ["tag1", "tag2", "tag3", ...]
}"#,
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DetectedLabel;
    use crate::models::FaceAttributes;

    fn analysis() -> ImageAnalysis {
        ImageAnalysis {
            labels: vec![
                DetectedLabel {
                    name: "Dog".to_string(),
                    confidence: 97.84,
                },
                DetectedLabel {
                    name: "Park".to_string(),
                    confidence: 88.0,
                },
            ],
            text_lines: vec![],
            faces: vec![],
        }
    }

    #[test]
    fn test_every_label_rendered_with_one_decimal_confidence() {
        let prompt = compose_description_prompt(&analysis());

        assert!(prompt.contains("Dog (confidence: 97.8%)"));
        assert!(prompt.contains("Park (confidence: 88.0%)"));
    }

    #[test]
    fn test_optional_sections_omitted_when_empty() {
        let prompt = compose_description_prompt(&analysis());

        assert!(!prompt.contains("Text in the photo:"));
        assert!(!prompt.contains("Faces:"));
    }

    #[test]
    fn test_optional_sections_included_when_present() {
        let mut with_extras = analysis();
        with_extras.text_lines = vec!["NO PARKING".to_string(), "8AM-6PM".to_string()];
        with_extras.faces = vec![FaceAttributes {
            age_low: 25,
            age_high: 35,
            gender: "Female".to_string(),
            emotions: vec!["HAPPY".to_string(), "CALM".to_string()],
        }];

        let prompt = compose_description_prompt(&with_extras);

        assert!(prompt.contains("Text in the photo: NO PARKING, 8AM-6PM"));
        assert!(prompt.contains("Faces: Female, age 25-35, emotions: HAPPY, CALM"));
    }

    #[test]
    fn test_prompt_requests_json_shape() {
        let prompt = compose_description_prompt(&analysis());

        assert!(prompt.contains("3-5 sentences"));
        assert!(prompt.contains("5-10 appropriate tags"));
        assert!(prompt.contains(r#""description": "Photo description...""#));
        assert!(prompt.contains(r#""tags": ["tag1", "tag2", "tag3", ...]"#));
    }

    #[test]
    fn test_composition_is_deterministic() {
        let a = compose_description_prompt(&analysis());
        let b = compose_description_prompt(&analysis());
        assert_eq!(a, b);
    }
}
