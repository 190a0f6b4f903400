//! Hit testing: point → object lookup.
//!
//! Walks the stack top-down so the last painted object wins.

use collage_core::id::ObjectId;
use collage_core::model::Scene;

/// Find the topmost object at canvas position (px, py).
/// Returns `None` if only the background is hit.
pub fn hit_test(scene: &Scene, px: f32, py: f32) -> Option<ObjectId> {
    scene
        .objects
        .iter()
        .rev()
        .find(|obj| obj.contains(px, py))
        .map(|obj| obj.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use collage_core::model::SceneObject;
    use collage_core::source::ImageSource;

    fn image(n: u64, left: f32, top: f32) -> SceneObject {
        let mut obj = SceneObject::image(
            ObjectId::numbered("hitimg", n),
            ImageSource::new("image/png", vec![0u8], 100, 100),
        );
        obj.left = left;
        obj.top = top;
        obj
    }

    #[test]
    fn topmost_object_wins() {
        let mut scene = Scene::default();
        scene.add(image(1, 0.0, 0.0));
        scene.add(image(2, 50.0, 50.0));
        assert_eq!(hit_test(&scene, 75.0, 75.0), Some(ObjectId::numbered("hitimg", 2)));
        assert_eq!(hit_test(&scene, 25.0, 25.0), Some(ObjectId::numbered("hitimg", 1)));
    }

    #[test]
    fn background_is_none() {
        let mut scene = Scene::default();
        scene.add(image(3, 0.0, 0.0));
        assert_eq!(hit_test(&scene, 300.0, 300.0), None);
    }
}
