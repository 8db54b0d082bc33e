use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

/// Notices waiting to be shown. Owned by whoever runs the page, handed to the
/// form by reference.
#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notice>,
}

impl Notifications {
    pub fn new() -> Notifications {
        Notifications::default()
    }

    pub fn success(&mut self, description: impl Into<String>) {
        self.push(Notice {
            title: "Success!".to_owned(),
            description: description.into(),
            variant: Variant::Default,
        });
    }

    pub fn error(&mut self, description: impl Into<String>) {
        self.push(Notice {
            title: "Error".to_owned(),
            description: description.into(),
            variant: Variant::Destructive,
        });
    }

    pub fn push(&mut self, notice: Notice) {
        self.queue.push_back(notice);
    }

    pub fn pop(&mut self) -> Option<Notice> {
        self.queue.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Notice> + '_ {
        self.queue.drain(..)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_come_out_in_order() {
        let mut notices = Notifications::new();
        notices.success("saved");
        notices.error("boom");

        let drained: Vec<_> = notices.drain().collect();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].variant, Variant::Default);
        assert_eq!(drained[1].title, "Error");
        assert_eq!(drained[1].variant, Variant::Destructive);
        assert!(notices.is_empty());
    }
}
