//! Turns a method selection and its parameters into the instruction sent to the
//! image model, plus the second image (if any) that accompanies it.
//!
//! Compilation is split in two steps. [`GenerationIntent::from_parameters`]
//! validates a raw parameter snapshot into a variant that only holds what its
//! method needs; [`GenerationIntent::compile`] renders that variant and cannot
//! fail.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{GenerationMethod, ImagePayload, SpaceOption, StyleOption};

/// Everything the method selector holds, whatever method is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodParameters {
    pub method: GenerationMethod,
    pub space: SpaceOption,
    pub style: StyleOption,
    pub custom_prompt: String,
    pub reference_image: Option<ImagePayload>,
    pub decoration_image: Option<ImagePayload>,
    pub mask_image: Option<ImagePayload>,
}

impl MethodParameters {
    pub fn new(method: GenerationMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    /// Whether the active method has every input it needs.
    pub fn is_complete(&self) -> bool {
        GenerationIntent::from_parameters(self).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    Custom(String),
    Template { style: StyleOption, space: SpaceOption },
}

impl Description {
    pub fn render(&self) -> String {
        match self {
            Description::Custom(text) => text.clone(),
            Description::Template { style, space } => {
                format!("{}風格的{}", style.label(), space.label())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalTarget {
    Description(String),
    Mask(ImagePayload),
}

/// A validated generation intent, one variant per method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationIntent {
    Edit { instruction: String },
    Describe { description: Description },
    Reference { reference: ImagePayload },
    AddDecoration { decoration: ImagePayload },
    RemoveObject { target: RemovalTarget },
}

/// Output of the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrompt {
    pub method: GenerationMethod,
    pub prompt: String,
    pub secondary_image: Option<ImagePayload>,
    /// The free-text field is one-shot for this intent and is cleared after a
    /// successful generation.
    pub consumes_custom_prompt: bool,
}

impl GenerationIntent {
    pub fn from_parameters(params: &MethodParameters) -> Result<Self, ValidationError> {
        let text = params.custom_prompt.trim();

        let intent = match params.method {
            GenerationMethod::Edit => {
                if text.is_empty() {
                    return Err(ValidationError::MissingInstruction);
                }
                GenerationIntent::Edit {
                    instruction: text.to_string(),
                }
            }
            GenerationMethod::Describe => GenerationIntent::Describe {
                description: if text.is_empty() {
                    Description::Template {
                        style: params.style,
                        space: params.space,
                    }
                } else {
                    Description::Custom(text.to_string())
                },
            },
            GenerationMethod::Reference => GenerationIntent::Reference {
                reference: params
                    .reference_image
                    .clone()
                    .ok_or(ValidationError::MissingReferenceImage)?,
            },
            GenerationMethod::AddDecoration => GenerationIntent::AddDecoration {
                decoration: params
                    .decoration_image
                    .clone()
                    .ok_or(ValidationError::MissingDecorationImage)?,
            },
            GenerationMethod::RemoveObject => {
                let target = if !text.is_empty() {
                    RemovalTarget::Description(text.to_string())
                } else if let Some(mask) = &params.mask_image {
                    RemovalTarget::Mask(mask.clone())
                } else {
                    return Err(ValidationError::MissingRemovalTarget);
                };
                GenerationIntent::RemoveObject { target }
            }
        };

        Ok(intent)
    }

    pub fn method(&self) -> GenerationMethod {
        match self {
            GenerationIntent::Edit { .. } => GenerationMethod::Edit,
            GenerationIntent::Describe { .. } => GenerationMethod::Describe,
            GenerationIntent::Reference { .. } => GenerationMethod::Reference,
            GenerationIntent::AddDecoration { .. } => GenerationMethod::AddDecoration,
            GenerationIntent::RemoveObject { .. } => GenerationMethod::RemoveObject,
        }
    }

    pub fn compile(self) -> CompiledPrompt {
        let method = self.method();
        let (prompt, secondary_image, consumes_custom_prompt) = match self {
            GenerationIntent::Edit { instruction } => (
                format!(
                    "根據以下指令修改提供的圖片：'{}'。在修改時，請務必保持整個場景光源的一致性。任何新增或改變的物件，其光照和陰影都必須與原圖的光線環境完美匹配，並呈現柔和、自然的質感，以維持照片的真實感。",
                    instruction
                ),
                None,
                true,
            ),
            GenerationIntent::Describe { description } => (
                format!(
                    "生成一個符合以下描述的逼真室內空間：'{}'。這個空間必須有清晰、合乎邏輯的光源，且光影效果應偏向柔和自然。然後，將上傳的家具無縫地整合到這個空間中。最關鍵的一步是：精確地調整家具的光照和陰影，使其完全匹配你所創造的柔和場景光源，達到照片般真實的效果。",
                    description.render()
                ),
                None,
                false,
            ),
            GenerationIntent::Reference { reference } => (
                "分析參考圖片的整體風格、氛圍和光線條件。基於此分析，創造一個新的、風格一致的空間。然後，將上傳的家具放置到這個新空間中。最關鍵的一步是：完全複製參考圖片中的光源特性（方向、色溫、柔和度），並將其應用於家具上，調整其光照和陰影，使其呈現柔和、自然的質感，以實現無縫、逼真的整合。".to_string(),
                Some(reference),
                false,
            ),
            GenerationIntent::AddDecoration { decoration } => (
                "將第二張圖片（有白色背景的裝飾品）自然地放置到第一張圖片（場景）中的合適平面上（例如桌子、架子）。請務必移除裝飾品的白色背景，並根據場景的光源，為裝飾品添加準確、柔和的光照和陰影，使其完美融入場景中，達到照片般真實的效果。".to_string(),
                Some(decoration),
                false,
            ),
            GenerationIntent::RemoveObject {
                target: RemovalTarget::Description(text),
            } => (
                format!(
                    "從提供的圖片中移除 '{}'，並以符合周圍環境的方式真實地填補被移除的區域。",
                    text
                ),
                None,
                true,
            ),
            GenerationIntent::RemoveObject {
                target: RemovalTarget::Mask(mask),
            } => (
                "第二張圖片是一張遮罩。請從第一張圖片中移除遮罩所標示的區域（白色部分），並以符合周圍環境的方式真實地填補該區域，確保填補後的紋理、光線和陰影與背景無縫融合。".to_string(),
                Some(mask),
                false,
            ),
        };

        CompiledPrompt {
            method,
            prompt,
            secondary_image,
            consumes_custom_prompt,
        }
    }
}

/// Validates and compiles in one step.
pub fn compile(params: &MethodParameters) -> Result<CompiledPrompt, ValidationError> {
    GenerationIntent::from_parameters(params).map(GenerationIntent::compile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(tag: &str) -> ImagePayload {
        ImagePayload::new("image/png", tag)
    }

    fn params(method: GenerationMethod) -> MethodParameters {
        MethodParameters::new(method)
    }

    #[test]
    fn missing_inputs_fail_validation() {
        assert_eq!(
            compile(&params(GenerationMethod::Edit)),
            Err(ValidationError::MissingInstruction)
        );
        assert_eq!(
            compile(&params(GenerationMethod::Reference)),
            Err(ValidationError::MissingReferenceImage)
        );
        assert_eq!(
            compile(&params(GenerationMethod::AddDecoration)),
            Err(ValidationError::MissingDecorationImage)
        );
        assert_eq!(
            compile(&params(GenerationMethod::RemoveObject)),
            Err(ValidationError::MissingRemovalTarget)
        );
    }

    #[test]
    fn whitespace_instruction_counts_as_empty() {
        let mut p = params(GenerationMethod::Edit);
        p.custom_prompt = "   ".into();
        assert_eq!(compile(&p), Err(ValidationError::MissingInstruction));
        assert_eq!(
            ValidationError::MissingInstruction.to_string(),
            "請輸入您想如何修改空間的指令。"
        );
    }

    #[test]
    fn edit_embeds_instruction_and_consumes_it() {
        let mut p = params(GenerationMethod::Edit);
        p.custom_prompt = " paint the walls green ".into();
        let compiled = compile(&p).unwrap();
        assert!(compiled.prompt.contains("'paint the walls green'"));
        assert!(compiled.secondary_image.is_none());
        assert!(compiled.consumes_custom_prompt);
    }

    #[test]
    fn describe_falls_back_to_style_and_space() {
        let mut p = params(GenerationMethod::Describe);
        p.style = StyleOption::Modern;
        p.space = SpaceOption::LivingRoom;
        let compiled = compile(&p).unwrap();
        assert!(compiled.prompt.contains("Modern風格的Living Room"));
        assert!(compiled.secondary_image.is_none());
        assert!(!compiled.consumes_custom_prompt);
    }

    #[test]
    fn describe_prefers_custom_text() {
        let mut p = params(GenerationMethod::Describe);
        p.style = StyleOption::Japandi;
        p.custom_prompt = "a sunlit loft".into();
        let compiled = compile(&p).unwrap();
        assert!(compiled.prompt.contains("'a sunlit loft'"));
        assert!(!compiled.prompt.contains("Japandi"));
    }

    #[test]
    fn reference_and_decoration_attach_their_image() {
        let mut p = params(GenerationMethod::Reference);
        p.reference_image = Some(image("REF"));
        p.decoration_image = Some(image("DEC"));
        assert_eq!(compile(&p).unwrap().secondary_image, Some(image("REF")));

        p.method = GenerationMethod::AddDecoration;
        let compiled = compile(&p).unwrap();
        assert_eq!(compiled.secondary_image, Some(image("DEC")));
        assert!(compiled.prompt.contains("白色背景"));
    }

    #[test]
    fn remove_object_text_beats_mask() {
        let mut p = params(GenerationMethod::RemoveObject);
        p.custom_prompt = "the red chair".into();
        p.mask_image = Some(image("MASK"));
        let compiled = compile(&p).unwrap();
        assert!(compiled.secondary_image.is_none());
        assert!(compiled.prompt.contains("移除 'the red chair'"));
        assert!(compiled.consumes_custom_prompt);
    }

    #[test]
    fn remove_object_with_only_mask_uses_mask_variant() {
        let mut p = params(GenerationMethod::RemoveObject);
        p.mask_image = Some(image("MASK"));
        let compiled = compile(&p).unwrap();
        assert_eq!(compiled.secondary_image, Some(image("MASK")));
        assert!(compiled.prompt.starts_with("第二張圖片是一張遮罩"));
        assert!(!compiled.consumes_custom_prompt);
    }

    #[test]
    fn unrelated_images_are_ignored() {
        let mut p = params(GenerationMethod::Edit);
        p.custom_prompt = "brighter".into();
        p.reference_image = Some(image("REF"));
        p.mask_image = Some(image("MASK"));
        assert!(compile(&p).unwrap().secondary_image.is_none());
    }

    #[test]
    fn is_complete_tracks_required_inputs() {
        let mut p = params(GenerationMethod::Describe);
        assert!(p.is_complete());
        p.method = GenerationMethod::Reference;
        assert!(!p.is_complete());
        p.reference_image = Some(image("REF"));
        assert!(p.is_complete());
    }
}
