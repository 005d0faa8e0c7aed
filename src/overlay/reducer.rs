// ============================================================================
// Overlay Reducer
// ============================================================================
//
// Pure fold of one mutation envelope into an overlay list. Same inputs give
// the same output, so the view may re-run the fold on every re-render while
// a mutation is in flight.
//
// Per kind:
//   create  denormalize, stamp the optimistic sentinel, append
//   update  rewrite every matching row with the envelope's fields, id kept
//   delete  rewrite the matching row's id to the delete sentinel, row stays
//
// Rows marked for delete leave the list only when a reseed brings the next
// authoritative snapshot, which lets the view show a deleting state first.
//
// ============================================================================

use im::Vector;

use crate::core::{MutationEnvelope, MutationKind, RecordId};
use crate::entity::{EntityDescriptor, EntityRecord};

/// Folds one envelope into the overlay list, returning the next list.
///
/// Total over its input domain: unmatched update/delete targets degrade to a
/// no-op rather than failing, and duplicate matches are all rewritten.
pub fn reduce<D: EntityDescriptor>(
    list: &Vector<D::Record>,
    envelope: &MutationEnvelope<D::Record>,
    parents: &D::ParentSet,
) -> Vector<D::Record> {
    match envelope.kind {
        MutationKind::Create => {
            let mut appended = envelope.data.clone();
            D::denormalize(&mut appended, parents);
            appended.set_id(RecordId::optimistic());

            let mut next = list.clone();
            next.push_back(appended);
            next
        }
        MutationKind::Update => {
            let mut replacement = envelope.data.clone();
            D::denormalize(&mut replacement, parents);

            list.iter()
                .map(|item| {
                    if item.id() == envelope.data.id() {
                        let mut updated = replacement.clone();
                        updated.set_id(item.id().clone());
                        updated
                    } else {
                        item.clone()
                    }
                })
                .collect()
        }
        MutationKind::Delete => list
            .iter()
            .map(|item| {
                if item.id() == envelope.data.id() {
                    let mut marked = item.clone();
                    marked.set_id(RecordId::deleting());
                    marked
                } else {
                    item.clone()
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::catalog::{Post, PostEntity, Topic, TopicEntity, TopicParams};
    use chrono::{TimeZone, Utc};

    fn topic(id: &str, name: &str) -> Topic {
        Topic {
            id: RecordId::new(id),
            name: name.into(),
            slug: name.to_lowercase(),
            author_id: Some(RecordId::new("u1")),
            created_at: Utc.timestamp_opt(10, 0).unwrap(),
            updated_at: Utc.timestamp_opt(10, 0).unwrap(),
        }
    }

    fn post(id: &str, title: &str) -> Post {
        Post {
            id: RecordId::new(id),
            title: title.into(),
            slug: title.to_lowercase().replace(' ', "-"),
            content: format!("{title} body"),
            topic_id: RecordId::new("t1"),
            author_id: RecordId::new("u1"),
            created_at: Utc.timestamp_opt(20, 0).unwrap(),
            updated_at: Utc.timestamp_opt(20, 0).unwrap(),
            topic: None,
        }
    }

    fn topics() -> Vector<Topic> {
        vec![topic("t1", "Rust"), topic("t2", "Go")].into()
    }

    #[test]
    fn test_create_appends_with_optimistic_sentinel() {
        let list: Vector<Post> = vec![post("p1", "First"), post("p2", "Second")].into();
        let envelope = MutationEnvelope::create(post("", "Third"));

        let next = reduce::<PostEntity>(&list, &envelope, &topics());

        assert_eq!(next.len(), list.len() + 1);
        let last = next.back().unwrap();
        assert!(last.id.is_optimistic());
        assert_eq!(last.title, "Third");
        assert_eq!(last.topic.as_ref().map(|t| t.name.as_str()), Some("Rust"));
        // the input list is untouched
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_create_on_empty_list_yields_singleton() {
        let list: Vector<Post> = Vector::new();
        let envelope = MutationEnvelope::create(post("", "Only"));

        let next = reduce::<PostEntity>(&list, &envelope, &topics());

        assert_eq!(next.len(), 1);
        assert!(next[0].id.is_optimistic());
        assert_eq!(next[0].title, "Only");
    }

    #[test]
    fn test_update_rewrites_matching_row_in_place() {
        let list: Vector<Post> = vec![post("p1", "First"), post("p2", "Second")].into();
        let mut edited = post("p2", "Second, edited");
        edited.topic_id = RecordId::new("t2");
        let envelope = MutationEnvelope::update(edited);

        let next = reduce::<PostEntity>(&list, &envelope, &topics());

        assert_eq!(next.len(), 2);
        assert_eq!(next[0], list[0]);
        assert_eq!(next[1].id.as_str(), "p2");
        assert_eq!(next[1].title, "Second, edited");
        assert_eq!(next[1].topic.as_ref().map(|t| t.name.as_str()), Some("Go"));
    }

    #[test]
    fn test_update_without_match_is_noop() {
        let list: Vector<Post> = vec![post("p1", "First")].into();
        let envelope = MutationEnvelope::update(post("p9", "Phantom"));

        let next = reduce::<PostEntity>(&list, &envelope, &topics());
        assert_eq!(next, list);
    }

    #[test]
    fn test_update_rewrites_duplicate_matches_uniformly() {
        let list: Vector<Post> = vec![post("p1", "A"), post("p1", "B"), post("p2", "C")].into();
        let envelope = MutationEnvelope::update(post("p1", "Rewritten"));

        let next = reduce::<PostEntity>(&list, &envelope, &topics());

        assert_eq!(next[0].title, "Rewritten");
        assert_eq!(next[1].title, "Rewritten");
        assert_eq!(next[2].title, "C");
    }

    #[test]
    fn test_delete_marks_row_without_removing_it() {
        let list: Vector<Post> = vec![post("p1", "First"), post("p2", "Second")].into();
        let envelope = MutationEnvelope::delete(post("p1", "First"));

        let next = reduce::<PostEntity>(&list, &envelope, &topics());

        assert_eq!(next.len(), 2);
        assert!(next[0].id.is_deleting());
        assert_eq!(next[0].title, "First");
        assert_eq!(next[1].id.as_str(), "p2");
    }

    #[test]
    fn test_delete_twice_equals_delete_once() {
        let list: Vector<Post> = vec![post("p1", "First")].into();
        let envelope = MutationEnvelope::delete(post("p1", "First"));

        let once = reduce::<PostEntity>(&list, &envelope, &topics());
        let twice = reduce::<PostEntity>(&once, &envelope, &topics());

        assert_eq!(once, twice);
        assert!(twice[0].id.is_deleting());
    }

    #[test]
    fn test_delete_without_match_is_noop() {
        let list: Vector<Post> = vec![post("p1", "First")].into();
        let envelope = MutationEnvelope::delete(post("p9", "Phantom"));

        let next = reduce::<PostEntity>(&list, &envelope, &topics());
        assert_eq!(next, list);
    }

    #[test]
    fn test_create_with_unknown_parent_degrades_gracefully() {
        let list: Vector<Post> = Vector::new();
        let mut orphan = post("", "Orphan");
        orphan.topic_id = RecordId::new("t404");
        let envelope = MutationEnvelope::create(orphan);

        let next = reduce::<PostEntity>(&list, &envelope, &topics());

        assert_eq!(next.len(), 1);
        assert!(next[0].id.is_optimistic());
        assert!(next[0].topic.is_none());
    }

    #[test]
    fn test_reduce_is_deterministic() {
        let list: Vector<Post> = vec![post("p1", "First")].into();
        let envelope = MutationEnvelope::update(post("p1", "Edited"));

        let a = reduce::<PostEntity>(&list, &envelope, &topics());
        let b = reduce::<PostEntity>(&list, &envelope, &topics());
        assert_eq!(a, b);
    }

    #[test]
    fn test_parentless_entity_reduces_without_denormalization() {
        let list: Vector<Topic> = vec![topic("t1", "Rust")].into();
        let draft = TopicEntity::provisional(
            &TopicParams {
                name: "Zig".into(),
                slug: "zig".into(),
            },
            None,
            Utc.timestamp_opt(30, 0).unwrap(),
        );
        let envelope = MutationEnvelope::create(draft);

        let next = reduce::<TopicEntity>(&list, &envelope, &());
        assert_eq!(next.len(), 2);
        assert!(next.back().unwrap().id.is_optimistic());
    }
}
