/// Relationship ID mapper for tracking relationships during presentation generation.
///
/// Relationships are created first; the mapper then hands the actual IDs to
/// XML generation.
use std::collections::HashMap;

/// Maps (slide index, picture index within the slide) to the image
/// relationship ID of that slide.
#[derive(Debug, Default)]
pub struct RelationshipMapper {
    image_ids: HashMap<(usize, usize), String>,
}

impl RelationshipMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image relationship mapping for a specific slide.
    ///
    /// # Arguments
    /// * `slide_index` - The index of the slide (0-based)
    /// * `image_index_in_slide` - The index of the picture within that slide (0-based)
    /// * `rel_id` - The relationship ID (e.g., "rId2")
    pub fn add_image(&mut self, slide_index: usize, image_index_in_slide: usize, rel_id: String) {
        self.image_ids
            .insert((slide_index, image_index_in_slide), rel_id);
    }

    /// Get the relationship ID for a picture in a specific slide.
    pub fn get_image_id(&self, slide_index: usize, image_index_in_slide: usize) -> Option<&str> {
        self.image_ids
            .get(&(slide_index, image_index_in_slide))
            .map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_ids_are_per_slide() {
        let mut mapper = RelationshipMapper::new();
        mapper.add_image(0, 0, "rId2".into());
        mapper.add_image(1, 0, "rId2".into());
        mapper.add_image(1, 1, "rId3".into());

        assert_eq!(mapper.get_image_id(1, 1), Some("rId3"));
        assert_eq!(mapper.get_image_id(0, 1), None);
    }
}
