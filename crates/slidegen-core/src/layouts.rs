//! Example slide layouts. They seed the layout prompt as structural examples
//! and back the editor's "insert layout" palette.

use crate::content::{ContentKind, ContentNode};
use crate::slide::{resequence, Slide};

const SAMPLE_IMAGE: &str = "https://plus.unsplash.com/premium_photo-1729004379397-ece899804701?q=80&w=2767&auto=format&fit=crop";

fn title(placeholder: &str) -> ContentNode {
    ContentNode::new(ContentKind::Title, "Title").with_placeholder(placeholder)
}

fn heading(kind: ContentKind, name: &str, placeholder: &str) -> ContentNode {
    ContentNode::new(kind, name).with_placeholder(placeholder)
}

fn paragraph() -> ContentNode {
    ContentNode::new(ContentKind::Paragraph, "Paragraph").with_placeholder("Start typing...")
}

fn image(alt: &str) -> ContentNode {
    ContentNode::new(ContentKind::Image, "Image")
        .with_text(SAMPLE_IMAGE)
        .with_alt(alt)
}

fn resizable(name: &str, children: Vec<ContentNode>) -> ContentNode {
    ContentNode::new(ContentKind::ResizableColumn, name)
        .with_children(children)
        .with_class_name("border")
}

fn heading_block() -> ContentNode {
    ContentNode::column(vec![
        heading(ContentKind::Heading3, "Heading3", "Heading 3"),
        paragraph(),
    ])
}

fn slide(name: &str, kind: &str, class_name: &str, root: ContentNode) -> Slide {
    Slide::new(name, kind, root).with_class_name(class_name)
}

/// The built-in layouts, ordered 1..N. Every call allocates fresh ids.
pub fn example_layouts() -> Vec<Slide> {
    let centered = "p-8 mx-auto flex justify-center items-center";
    let padded = "p-4 mx-auto flex justify-center items-center";

    let mut layouts = vec![
        slide(
            "Blank Card",
            "blank-card",
            "p-8 mx-auto flex justify-center items-center min-h-[200px]",
            ContentNode::column(vec![title("Untitled Card")]),
        ),
        slide(
            "Accent Left",
            "accentLeft",
            "min-h-[300px]",
            ContentNode::column(vec![ContentNode::new(
                ContentKind::ResizableColumn,
                "Resizable column",
            )
            .with_children(vec![image("Professional presentation accent image")])
            .restrict_to_drop()])
            .restrict_to_drop(),
        ),
        slide(
            "Image and Text",
            "imageAndText",
            "min-h-[200px] p-8 mx-auto flex justify-center items-center",
            ContentNode::column(vec![resizable(
                "Image and text",
                vec![
                    ContentNode::column(vec![image("Professional business presentation image")
                        .with_class_name("p-3")]),
                    ContentNode::column(vec![
                        heading(ContentKind::Heading1, "Heading1", "Heading1"),
                        paragraph(),
                    ])
                    .with_class_name("w-full h-full p-8 flex items-center justify-center"),
                ],
            )]),
        ),
        slide(
            "Text and Image",
            "textAndImage",
            "min-h-[200px] p-8 mx-auto flex justify-center items-center",
            ContentNode::column(vec![resizable(
                "Text and image",
                vec![
                    ContentNode::column(vec![
                        heading(ContentKind::Heading1, "Heading1", "Heading1"),
                        paragraph(),
                    ])
                    .with_class_name("w-full h-full p-8 flex items-center justify-center"),
                    ContentNode::column(vec![
                        image("Professional business presentation image").with_class_name("p-3")
                    ]),
                ],
            )]),
        ),
        slide(
            "Two Columns",
            "twoColumns",
            padded,
            ContentNode::column(vec![
                title("Untitled Card"),
                resizable("Two columns layout", vec![paragraph(), paragraph()]),
                heading_block(),
            ]),
        ),
        slide(
            "Two Columns with Headings",
            "twoColumnsWithHeadings",
            padded,
            ContentNode::column(vec![
                title("Untitled Card"),
                resizable(
                    "Two columns with headings",
                    vec![heading_block(), heading_block()],
                ),
            ]),
        ),
        slide(
            "Three Columns",
            "threeColumn",
            padded,
            ContentNode::column(vec![
                title("Untitled Card"),
                resizable(
                    "Three columns layout",
                    vec![paragraph(), paragraph(), paragraph()],
                ),
            ]),
        ),
        slide(
            "Title with Bullet List",
            "titleWithBulletList",
            padded,
            ContentNode::column(vec![
                title("Presentation Title"),
                ContentNode::new(ContentKind::BulletedList, "Bulleted List")
                    .with_items(vec![String::new(); 3])
                    .with_placeholder("List item..."),
            ]),
        ),
        slide(
            "Quote Slide",
            "quoteSlide",
            &format!("{centered} min-h-[300px]"),
            ContentNode::column(vec![
                heading(ContentKind::Blockquote, "Quote", "Enter your quote here..."),
                ContentNode::new(ContentKind::Paragraph, "Attribution")
                    .with_placeholder("- Author Name")
                    .with_class_name("text-right mt-4"),
            ]),
        ),
    ];

    resequence(&mut layouts);
    layouts
}

/// Find a built-in layout by its `type` name.
pub fn layout_by_kind(kind: &str) -> Option<Slide> {
    example_layouts().into_iter().find(|s| s.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_layouts_are_dense_and_unique() {
        let layouts = example_layouts();
        let orders: Vec<_> = layouts.iter().filter_map(|s| s.slide_order).collect();
        assert_eq!(orders, (1..=layouts.len() as u32).collect::<Vec<_>>());

        let kinds: HashSet<_> = layouts.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds.len(), layouts.len());
    }

    #[test]
    fn test_layouts_survive_json() {
        let layouts = example_layouts();
        let json = serde_json::to_string(&layouts).unwrap();
        let decoded: Vec<Slide> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, layouts);
    }

    #[test]
    fn test_image_layout_has_nested_image() {
        let slide = layout_by_kind("imageAndText").unwrap();
        let images = slide.content.collect_kind(&ContentKind::Image);
        assert_eq!(images.len(), 1);
        assert!(images[0].attrs.alt.is_some());
    }
}
