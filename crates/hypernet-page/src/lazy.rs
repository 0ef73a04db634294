use std::collections::HashSet;

pub const LAZY_CLASS: &str = "lazy";

/// An `<img>` that may be waiting on its real source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LazyImage {
    pub id: String,
    pub src: Option<String>,
    pub data_src: Option<String>,
    pub classes: Vec<String>,
}

impl LazyImage {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Swaps `data-src` into `src` once an image scrolls into view
///
/// Without intersection support nothing is observed and images keep
/// whatever `src` they shipped with.
#[derive(Debug, Default)]
pub struct LazyImageLoader {
    supported: bool,
    observed: HashSet<String>,
}

impl LazyImageLoader {
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            observed: HashSet::new(),
        }
    }

    /// Start watching every image with a `data-src`; returns how many
    pub fn observe_all(&mut self, images: &[LazyImage]) -> usize {
        if !self.supported {
            return 0;
        }
        for image in images.iter().filter(|i| i.data_src.is_some()) {
            self.observed.insert(image.id.clone());
        }
        self.observed.len()
    }

    pub fn is_observing(&self, id: &str) -> bool {
        self.observed.contains(id)
    }

    /// Intersection callback for one image; `true` if it was loaded
    pub fn on_intersection(&mut self, image: &mut LazyImage, is_intersecting: bool) -> bool {
        if !is_intersecting || !self.observed.remove(&image.id) {
            return false;
        }

        image.src = image.data_src.clone();
        image.classes.retain(|c| c != LAZY_CLASS);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(id: &str, data_src: Option<&str>) -> LazyImage {
        LazyImage {
            id: id.into(),
            src: None,
            data_src: data_src.map(String::from),
            classes: vec!["hero".into(), LAZY_CLASS.into()],
        }
    }

    #[test]
    fn test_loads_once_on_intersection() {
        let mut images = vec![img("a", Some("/img/a.webp")), img("b", None)];
        let mut loader = LazyImageLoader::new(true);
        assert_eq!(loader.observe_all(&images), 1);

        assert!(!loader.on_intersection(&mut images[0], false));
        assert_eq!(images[0].src, None);

        assert!(loader.on_intersection(&mut images[0], true));
        assert_eq!(images[0].src.as_deref(), Some("/img/a.webp"));
        assert!(!images[0].has_class(LAZY_CLASS));
        assert!(images[0].has_class("hero"));
        assert!(!loader.is_observing("a"));

        // unobserved now
        assert!(!loader.on_intersection(&mut images[0], true));
        // never observed
        assert!(!loader.on_intersection(&mut images[1], true));
    }

    #[test]
    fn test_unsupported_observes_nothing() {
        let mut images = vec![img("a", Some("/img/a.webp"))];
        let mut loader = LazyImageLoader::new(false);
        assert_eq!(loader.observe_all(&images), 0);
        assert!(!loader.on_intersection(&mut images[0], true));
        assert_eq!(images[0].src, None);
    }
}
