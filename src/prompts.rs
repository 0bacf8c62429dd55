/*!
 * Prompt construction for every model call the pipeline makes.
 *
 * The condensed accessibility standards ride along with every primary
 * request; callers can append their own reference document on top.
 */

use crate::sections::{GenerationMode, ImageType};

/// Condensed accessibility standards included with every primary request
const ACCESSIBILITY_STANDARDS: &str = "\
ACCESSIBILITY STANDARDS FOR IMAGE DESCRIPTIONS

Alt text:
- One sentence, 120 characters maximum, no trailing period required.
- State the image type and its single most important takeaway.
- Never start with \"Image of\" or \"Picture of\".

Figure description:
- One to three sentences of interpretation: what the figure MEANS,
  not what it looks like.
- Do not begin with \"Figure N\" or \"The diagram shows\".

Long description:
- A complete structural walk-through for readers who cannot see the
  image: axes, units, trends, labels, spatial layout, in reading order.
- Write out every unit abbreviation in full words (say \"milligrams
  per liter\", never \"mg/L\").

Transcribed text:
- Every piece of visible text in the image, verbatim, in reading
  order. Do not paraphrase, correct, or omit anything.";

/// Fixed prompt for the image-type classification call
pub const CLASSIFICATION_PROMPT: &str = "\
Classify this image into exactly one category. Reply with only the \
category name, nothing else:
CHART_GRAPH - charts, graphs, plots, data visualizations
SCIENTIFIC_FIGURE - scientific diagrams, biological illustrations, technical schematics
PHOTOGRAPH - photographs of people, animals, objects, or scenes
MIXED - a combination of the above";

/// Extra emphasis appended per detected image type
fn image_type_guidance(image_type: ImageType) -> &'static str {
    match image_type {
        ImageType::ChartGraph => {
            "\nThis is a data visualization. In the long description, report axis \
             labels, units, scales, and the overall trend before any individual values."
        }
        ImageType::ScientificFigure => {
            "\nThis is a scientific figure. In the long description, name each \
             labeled part and describe how the parts relate spatially."
        }
        ImageType::Photograph => {
            "\nThis is a photograph. Describe the subject, setting, and any \
             action; skip chart-specific instructions."
        }
        ImageType::Mixed => "",
    }
}

/// Build the primary generation prompt for the requested mode
pub fn generation_prompt(
    mode: GenerationMode,
    image_type: ImageType,
    context: Option<&str>,
    reference_document: Option<&str>,
    structured: bool,
) -> String {
    let mut prompt = String::new();

    match mode {
        GenerationMode::AltTextOnly => {
            prompt.push_str(
                "Write alt text for this image: one sentence, 120 characters maximum, \
                 stating the image type and its single most important takeaway. \
                 Reply with the alt text only, no label and no quotes.",
            );
        }
        GenerationMode::LongDescriptionOnly => {
            prompt.push_str(
                "Write a long description for this image: a complete structural \
                 walk-through for readers who cannot see it, covering axes, units, \
                 trends, labels, and layout in reading order. Write out every unit \
                 abbreviation in full words. Reply with the description only, no label.",
            );
        }
        GenerationMode::Full => {
            if structured {
                prompt.push_str(
                    "Produce accessibility descriptions for this image as a JSON \
                     object with exactly these string fields: \"altText\", \
                     \"figureDescription\", \"longDescription\", \"transcribedText\". \
                     Reply with the JSON object only.",
                );
            } else {
                prompt.push_str(
                    "Produce accessibility descriptions for this image as four \
                     labeled sections, in this order:\n\
                     1. **Alt Text** (120 characters max)\n\
                     2. **Figure Description**\n\
                     3. **Long Description**\n\
                     4. **Transcribed Text**",
                );
            }
            prompt.push_str(image_type_guidance(image_type));
        }
    }

    prompt.push_str("\n\n");
    prompt.push_str(ACCESSIBILITY_STANDARDS);

    if let Some(reference) = reference_document {
        prompt.push_str("\n\nADDITIONAL REFERENCE DOCUMENT:\n");
        prompt.push_str(reference);
    }
    if let Some(context) = context {
        prompt.push_str("\n\nCONTEXT FOR THIS IMAGE: ");
        prompt.push_str(context);
    }

    prompt
}

/// Prompt for the single alt-text shortening retry
pub fn shorten_prompt(current: &str, length: usize, budget: usize) -> String {
    format!(
        "The following alt text is {length} characters, over the {budget}-character \
         limit. Rewrite it to fit within {budget} characters while keeping the image \
         type and the most important takeaway. Reply with the rewritten alt text \
         only, no quotes.\n\n{current}"
    )
}

/// Prompt for the unknown-abbreviation escalation call
pub fn expansion_prompt(snippet: &str) -> String {
    format!(
        "The text describing this image contains the abbreviation \"{snippet}\". \
         Using the image for context, reply with only the fully spelled-out form \
         of that abbreviation (for example \"milligrams per liter\"). If you \
         cannot determine it with confidence, reply with exactly UNKNOWN."
    )
}
