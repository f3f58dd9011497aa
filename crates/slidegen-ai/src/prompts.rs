use slidegen_core::Slide;

pub const OUTLINE_SYSTEM_PROMPT: &str =
    "You are a helpful AI that generates outlines for presentations.";

pub const LAYOUTS_SYSTEM_PROMPT: &str = "You are a highly creative AI that generates JSON-based layouts for presentations. Always return valid JSON format without any additional text or explanations.";

pub const IMAGE_SYSTEM_PROMPT: &str =
    "You are an expert at creating detailed image descriptions for professional presentations.";

pub const SMOKE_TEST_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const SMOKE_TEST_PROMPT: &str = "Generate a simple greeting message.";

pub fn outline_prompt(user_prompt: &str) -> String {
    format!(
        r#"Create a coherent and relevant outline for the following prompt: {user_prompt}.

The outline should consist of at least 6 points, with each point written as a single sentence. Ensure the outline is well-structured and directly related to the topic. Return the output in the following JSON format:

{{
  "outline": [
    "Point 1",
    "Point 2",
    "Point 3",
    "Point 4",
    "Point 5",
    "Point 6"
  ]
}}

Ensure that the JSON is valid and properly formatted. Do not include any other text or explanations outside the JSON."#
    )
}

/// Layout prompt carrying the example layouts and the outline as JSON.
pub fn layouts_prompt(outline: &[String], examples: &[Slide]) -> serde_json::Result<String> {
    let examples = serde_json::to_string_pretty(examples)?;
    let outline = serde_json::to_string(outline)?;

    Ok(format!(
        r#"I will provide you with an array of outlines, and for each outline, you must generate a unique and creative layout. Use the existing layouts as examples for structure and design, and generate unique designs based on the provided outline.

## Guidelines:
1. Write layouts based on the specific outline provided.
2. Use diverse and engaging designs, ensuring each layout is unique.
3. Adhere to the structure of existing layouts but add new styles or components if needed.
4. Fill placeholder data into content fields where required.
5. Generate unique image placeholders for the 'content' property of image components and alt text according to the outline.
6. Ensure proper formatting and schema alignment for the output JSON.

## Example Layouts:
{examples}

## Outline Array:
{outline}

For each entry in the outline array, generate:
- A unique JSON layout with creative designs.
- Properly filled content, including placeholder for image components.
- Clear and well-structured JSON data.
For Images:
- The alt text should describe the image clearly and concisely.
- Focus on the main subject(s) of the image and any relevant details such as colors, shapes, people, or objects.
- Ensure the alt text aligns with the context of the presentation slide it will be used on (e.g., professional, educational, business-related).
- Avoid using terms like "image of" or "picture of," and instead focus directly on the content and meaning.

Output the layouts as a JSON array of slides. Ensure there are no duplicate layouts across the array."#
    ))
}

pub fn image_description_prompt(description: &str) -> String {
    format!(
        r#"Create a detailed description for generating an image: Create a highly realistic, professional image based on the following description. The image should look as if captured in real life, with attention to detail, lighting, and texture.

Description: {description}

Important Notes:
- The image must be in a photorealistic style and visually compelling.
- Ensure all text, signs, or visible writing in the image are in English.
- Pay special attention to lighting, shadows, and textures to make the image as lifelike as possible.
- Avoid elements that appear abstract, cartoonish, or overly artistic. The image should be suitable for professional presentations.
- Focus on accurately depicting the concept described, including specific objects, environment, mood and context."#
    )
}
