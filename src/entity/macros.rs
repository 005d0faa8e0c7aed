/// Implements [`EntityRecord`](crate::entity::EntityRecord) for a catalog
/// struct and emits its `{Name}Id` alias.
///
/// Arms cover the shapes the catalog needs: required or optional owner
/// field, with or without timestamp columns. The struct itself stays
/// hand-written so field layout and serde attributes remain visible at the
/// declaration site.
#[macro_export]
macro_rules! entity_record {
    ($name:ident, owner = opt $owner:ident, timestamps) => {
        $crate::entity_record!(@id_alias $name);
        impl $crate::entity::EntityRecord for $name {
            $crate::entity_record!(@id_methods);
            fn owner_id(&self) -> Option<&$crate::core::RecordId> {
                self.$owner.as_ref()
            }
            fn set_owner(&mut self, owner: $crate::core::RecordId) {
                self.$owner = Some(owner);
            }
            $crate::entity_record!(@timestamp_methods);
        }
    };
    ($name:ident, owner = $owner:ident, timestamps) => {
        $crate::entity_record!(@id_alias $name);
        impl $crate::entity::EntityRecord for $name {
            $crate::entity_record!(@id_methods);
            $crate::entity_record!(@owner_methods $owner);
            $crate::entity_record!(@timestamp_methods);
        }
    };
    ($name:ident, owner = $owner:ident) => {
        $crate::entity_record!(@id_alias $name);
        impl $crate::entity::EntityRecord for $name {
            $crate::entity_record!(@id_methods);
            $crate::entity_record!(@owner_methods $owner);
        }
    };
    (@id_alias $name:ident) => {
        $crate::paste::paste! {
            pub type [<$name Id>] = $crate::core::RecordId;
        }
    };
    (@id_methods) => {
        fn id(&self) -> &$crate::core::RecordId {
            &self.id
        }
        fn set_id(&mut self, id: $crate::core::RecordId) {
            self.id = id;
        }
    };
    (@owner_methods $owner:ident) => {
        fn owner_id(&self) -> Option<&$crate::core::RecordId> {
            Some(&self.$owner)
        }
        fn set_owner(&mut self, owner: $crate::core::RecordId) {
            self.$owner = owner;
        }
    };
    (@timestamp_methods) => {
        fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
            Some(self.created_at)
        }
        fn updated_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
            Some(self.updated_at)
        }
        fn stamp_created(&mut self, at: chrono::DateTime<chrono::Utc>) {
            self.created_at = at;
        }
        fn stamp_updated(&mut self, at: chrono::DateTime<chrono::Utc>) {
            self.updated_at = at;
        }
    };
}
