/// Composes a multi-type store and its type-erased handle.
///
/// Given a struct name, an enum name, and a declaration list of
/// `Variant(Type)` pairs, this generates:
///
/// - the store struct, holding one [`Bucket<T>`][crate::Bucket] per declared
///   type, with typed operations (`insert`, `erase`, `get`, `get_mut`,
///   `is_valid`, `len_of`, `iter`, `iter_mut`, `view`, `view_mut`) that are
///   only callable for declared types, plus whole-store operations (`len`,
///   `is_empty`, `clear`, `erase_any`, `is_valid_any`);
/// - one [`Declares<T>`][crate::Declares] implementation per declared type,
///   fixing the declaration-order type index;
/// - the handle enum: a closed tagged union over the typed handles, built
///   implicitly `From` any of them and narrowed back with
///   [`TryFrom`]/`narrow::<T>()`, which reports
///   [`TypeMismatch`][crate::TypeMismatch] instead of panicking.
///
/// The declared set is fixed when the macro is expanded. Asking for an
/// undeclared type does not compile, and declaring the same type twice is
/// rejected (it would produce two conflicting `Declares` implementations).
///
/// Variant names double as the bucket field names (snake-cased), so each
/// variant name must be unique too.
///
/// # Example
///
/// ```rust
/// use multi_store::multi_store;
///
/// #[derive(Debug, PartialEq)]
/// struct Mesh {
///     triangles: u32,
/// }
///
/// #[derive(Debug, PartialEq)]
/// struct Light {
///     lumens: u32,
/// }
///
/// multi_store! {
///     /// All objects owned by one scene.
///     pub struct Scene;
///     /// A handle to any object in a [`Scene`].
///     pub enum SceneHandle;
///     types {
///         Mesh(Mesh),
///         Light(Light),
///     }
/// }
///
/// let mut scene = Scene::new();
///
/// let mesh = scene.insert(Mesh { triangles: 12 });
/// let light = scene.insert(Light { lumens: 800 });
/// assert_eq!(scene.len(), 2);
///
/// // Type-erased storage of mixed handles.
/// let handles: Vec<SceneHandle> = vec![mesh.into(), light.into()];
///
/// // Narrowing recovers the typed handle, or reports the mismatch.
/// assert_eq!(handles[0].narrow::<Mesh>(), Ok(mesh));
/// assert!(handles[0].narrow::<Light>().is_err());
///
/// // Erasure through the erased handle needs no type knowledge.
/// scene.erase_any(handles[0])?;
/// assert_eq!(scene.len(), 1);
/// # Ok::<(), multi_store::BucketError>(())
/// ```
#[macro_export]
macro_rules! multi_store {
    (
        $(#[$store_attr:meta])*
        $store_vis:vis struct $store:ident;
        $(#[$handle_attr:meta])*
        $handle_vis:vis enum $handle:ident;
        types {
            $( $variant:ident ( $ty:ty ) ),+ $(,)?
        }
    ) => {
        $crate::__private::paste! {
            $(#[$store_attr])*
            $store_vis struct $store {
                $( [<$variant:snake>]: $crate::Bucket<$ty>, )+
            }

            impl $store {
                /// The number of declared types, which is also the number of
                /// buckets in this store.
                $store_vis const TYPE_COUNT: usize = [ $( stringify!($variant) ),+ ].len();

                /// Creates a store whose buckets use the default
                /// configuration.
                #[must_use]
                $store_vis fn new() -> Self {
                    Self {
                        $( [<$variant:snake>]: $crate::Bucket::new(), )+
                    }
                }

                /// Creates a store whose buckets all start with the given
                /// first allocation block capacity.
                #[must_use]
                $store_vis fn with_first_block_capacity(
                    capacity: ::core::num::NonZero<usize>,
                ) -> Self {
                    Self {
                        $(
                            [<$variant:snake>]: $crate::Bucket::builder()
                                .first_block_capacity(capacity)
                                .build(),
                        )+
                    }
                }

                /// Inserts a value of one of the declared types, returning
                /// its typed handle.
                ///
                /// The handle converts into the store's erased handle enum
                /// via `From`/`Into` whenever type-agnostic storage is
                /// needed.
                #[must_use]
                $store_vis fn insert<T>(&mut self, value: T) -> $crate::Handle<T>
                where
                    Self: $crate::Declares<T>,
                {
                    <Self as $crate::Declares<T>>::bucket_mut(self).insert(value)
                }

                /// Removes the object a typed handle refers to, returning it.
                ///
                /// # Errors
                ///
                /// Propagates the bucket's verdict on an unusable handle
                /// (sentinel, foreign, or already erased).
                $store_vis fn erase<T>(
                    &mut self,
                    handle: $crate::Handle<T>,
                ) -> ::core::result::Result<T, $crate::BucketError>
                where
                    Self: $crate::Declares<T>,
                {
                    <Self as $crate::Declares<T>>::bucket_mut(self).erase(handle)
                }

                /// Removes the object an erased handle refers to, without the
                /// caller knowing its type.
                ///
                /// # Errors
                ///
                /// Propagates the bucket's verdict on an unusable handle
                /// (sentinel, foreign, or already erased).
                $store_vis fn erase_any(
                    &mut self,
                    handle: $handle,
                ) -> ::core::result::Result<(), $crate::BucketError> {
                    match handle {
                        $(
                            $handle::$variant(handle) => {
                                self.[<$variant:snake>].erase(handle).map(|_| ())
                            }
                        )+
                    }
                }

                /// Dereferences a typed handle to a shared reference.
                ///
                /// # Errors
                ///
                /// Propagates the bucket's verdict on an unusable handle.
                $store_vis fn get<T>(
                    &self,
                    handle: $crate::Handle<T>,
                ) -> ::core::result::Result<&T, $crate::BucketError>
                where
                    Self: $crate::Declares<T>,
                {
                    <Self as $crate::Declares<T>>::bucket(self).get(handle)
                }

                /// Dereferences a typed handle to an exclusive reference.
                ///
                /// # Errors
                ///
                /// Propagates the bucket's verdict on an unusable handle.
                $store_vis fn get_mut<T>(
                    &mut self,
                    handle: $crate::Handle<T>,
                ) -> ::core::result::Result<&mut T, $crate::BucketError>
                where
                    Self: $crate::Declares<T>,
                {
                    <Self as $crate::Declares<T>>::bucket_mut(self).get_mut(handle)
                }

                /// Whether a typed handle currently refers to a live object
                /// in this store.
                #[must_use]
                $store_vis fn is_valid<T>(&self, handle: $crate::Handle<T>) -> bool
                where
                    Self: $crate::Declares<T>,
                {
                    <Self as $crate::Declares<T>>::bucket(self).is_valid(handle)
                }

                /// Whether an erased handle currently refers to a live object
                /// in this store.
                #[must_use]
                $store_vis fn is_valid_any(&self, handle: $handle) -> bool {
                    match handle {
                        $(
                            $handle::$variant(handle) => {
                                self.[<$variant:snake>].is_valid(handle)
                            }
                        )+
                    }
                }

                /// The number of live objects across all declared types.
                ///
                /// Sums the per-bucket counts, so this is O(number of
                /// declared types), independent of how many objects exist.
                #[must_use]
                $store_vis fn len(&self) -> usize {
                    let mut total: usize = 0;
                    $(
                        total = total
                            .checked_add(self.[<$variant:snake>].len())
                            .expect("the total object count is bounded by addressable memory");
                    )+
                    total
                }

                /// Whether no bucket holds any live object.
                #[must_use]
                $store_vis fn is_empty(&self) -> bool {
                    true $( && self.[<$variant:snake>].is_empty() )+
                }

                /// The number of live objects of one declared type.
                #[must_use]
                $store_vis fn len_of<T>(&self) -> usize
                where
                    Self: $crate::Declares<T>,
                {
                    <Self as $crate::Declares<T>>::bucket(self).len()
                }

                /// Iterates one declared type's live objects in insertion
                /// order.
                #[must_use]
                $store_vis fn iter<T>(&self) -> $crate::Iter<'_, T>
                where
                    Self: $crate::Declares<T>,
                {
                    <Self as $crate::Declares<T>>::bucket(self).iter()
                }

                /// Iterates one declared type's live objects in insertion
                /// order with exclusive access.
                #[must_use]
                $store_vis fn iter_mut<T>(&mut self) -> $crate::IterMut<'_, T>
                where
                    Self: $crate::Declares<T>,
                {
                    <Self as $crate::Declares<T>>::bucket_mut(self).iter_mut()
                }

                /// A shared view of one declared type's objects, for use in
                /// `for` loops.
                #[must_use]
                $store_vis fn view<T>(&self) -> $crate::TypedView<'_, T>
                where
                    Self: $crate::Declares<T>,
                {
                    $crate::TypedView::new(<Self as $crate::Declares<T>>::bucket(self))
                }

                /// An exclusive view of one declared type's objects, for use
                /// in `for` loops that modify them.
                #[must_use]
                $store_vis fn view_mut<T>(&mut self) -> $crate::TypedViewMut<'_, T>
                where
                    Self: $crate::Declares<T>,
                {
                    $crate::TypedViewMut::new(<Self as $crate::Declares<T>>::bucket_mut(self))
                }

                /// Drops every object of every declared type.
                ///
                /// Handles issued before the clear are invalidated, and their
                /// use is detected and reported.
                $store_vis fn clear(&mut self) {
                    $( self.[<$variant:snake>].clear(); )+
                }

                /// The declaration-order index of one declared type.
                #[must_use]
                $store_vis fn type_index_of<T>() -> usize
                where
                    Self: $crate::Declares<T>,
                {
                    <Self as $crate::Declares<T>>::TYPE_INDEX
                }

                /// The name of the declared type at the given declaration
                /// index, or `None` if the index is out of range.
                #[must_use]
                $store_vis fn type_name_at(index: usize) -> ::core::option::Option<&'static str> {
                    [ $( ::core::any::type_name::<$ty>() ),+ ].get(index).copied()
                }
            }

            impl ::core::default::Default for $store {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl ::core::fmt::Debug for $store {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    f.debug_struct(stringify!($store))
                        $( .field(stringify!([<$variant:snake>]), &self.[<$variant:snake>]) )+
                        .finish()
                }
            }

            $(#[$handle_attr])*
            #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
            $handle_vis enum $handle {
                $(
                    #[doc = concat!("A handle to a `", stringify!($ty), "` object.")]
                    $variant($crate::Handle<$ty>),
                )+
            }

            impl $handle {
                /// Narrows to the typed handle for `T`.
                ///
                /// # Errors
                ///
                /// Reports a `TypeMismatch` naming both types when `T` is not
                /// the active tag. Probing several candidate types in turn is
                /// the expected way to use this.
                $handle_vis fn narrow<T>(
                    self,
                ) -> ::core::result::Result<$crate::Handle<T>, $crate::TypeMismatch>
                where
                    $crate::Handle<T>: ::core::convert::TryFrom<Self, Error = $crate::TypeMismatch>,
                {
                    <$crate::Handle<T> as ::core::convert::TryFrom<Self>>::try_from(self)
                }

                /// Whether the underlying typed handle is the invalid
                /// sentinel.
                ///
                /// The authoritative liveness check is the owning store's
                /// `is_valid_any`.
                #[must_use]
                $handle_vis fn is_sentinel(&self) -> bool {
                    match self {
                        $( Self::$variant(handle) => handle.is_sentinel(), )+
                    }
                }

                /// The declaration-order index of the active type.
                #[must_use]
                $handle_vis fn type_index(&self) -> usize {
                    match self {
                        $( Self::$variant(_) => <$store as $crate::Declares<$ty>>::TYPE_INDEX, )+
                    }
                }

                /// The name of the active type.
                #[must_use]
                $handle_vis fn type_name(&self) -> &'static str {
                    match self {
                        $( Self::$variant(_) => ::core::any::type_name::<$ty>(), )+
                    }
                }
            }

            $(
                impl ::core::convert::From<$crate::Handle<$ty>> for $handle {
                    fn from(handle: $crate::Handle<$ty>) -> Self {
                        Self::$variant(handle)
                    }
                }

                impl ::core::convert::TryFrom<$handle> for $crate::Handle<$ty> {
                    type Error = $crate::TypeMismatch;

                    #[allow(
                        unreachable_patterns,
                        reason = "a store declaring a single type leaves the mismatch arm unreachable"
                    )]
                    fn try_from(
                        handle: $handle,
                    ) -> ::core::result::Result<Self, $crate::TypeMismatch> {
                        match handle {
                            $handle::$variant(handle) => ::core::result::Result::Ok(handle),
                            other => ::core::result::Result::Err($crate::TypeMismatch::new(
                                ::core::any::type_name::<$ty>(),
                                other.type_name(),
                            )),
                        }
                    }
                }
            )+
        }

        $crate::multi_store!(@declares $store; 0_usize; $( $variant($ty), )+);
    };

    // Implements `Declares<T>` per declared type, counting the declaration
    // index up through the recursion.
    (@declares $store:ident; $index:expr; ) => {};

    (@declares $store:ident; $index:expr; $variant:ident ( $ty:ty ), $($rest:tt)*) => {
        $crate::__private::paste! {
            impl $crate::Declares<$ty> for $store {
                const TYPE_INDEX: usize = $index;

                fn bucket(&self) -> &$crate::Bucket<$ty> {
                    &self.[<$variant:snake>]
                }

                fn bucket_mut(&mut self) -> &mut $crate::Bucket<$ty> {
                    &mut self.[<$variant:snake>]
                }
            }
        }

        $crate::multi_store!(@declares $store; $index + 1_usize; $($rest)*);
    };
}

#[cfg(test)]
mod tests {
    #![allow(
        dead_code,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing,
        reason = "test stores expose more generated surface than any one test touches"
    )]

    use std::any::type_name;

    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use crate::{BucketError, Handle, TypeMismatch};

    multi_store! {
        /// Two-type store used by most of these tests.
        struct Registry;
        /// Erased handle into [`Registry`].
        enum RegistryHandle;
        types {
            Number(i64),
            Label(String),
        }
    }

    multi_store! {
        /// Regression target: a single declared type must also compose.
        struct Solo;
        /// Erased handle into [`Solo`].
        enum SoloHandle;
        types {
            Only(u8),
        }
    }

    assert_impl_all!(RegistryHandle: Send, Sync, Copy);

    #[test]
    fn insert_then_erase_across_types() {
        let mut registry = Registry::new();

        let number = registry.insert(5_i64);
        let label = registry.insert("x".to_string());
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.erase(number), Ok(5));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.iter::<i64>().count(), 0);
        assert_eq!(
            registry.iter::<String>().map(String::as_str).collect::<Vec<_>>(),
            ["x"]
        );

        assert!(registry.is_valid(label));
    }

    #[test]
    fn narrow_round_trips_and_reports_mismatches() {
        let mut registry = Registry::new();

        let number = registry.insert(5_i64);
        let generic = RegistryHandle::from(number);

        let mismatch = generic.narrow::<String>().unwrap_err();
        assert_eq!(mismatch.requested(), type_name::<String>());
        assert_eq!(mismatch.actual(), type_name::<i64>());

        assert_eq!(generic.narrow::<i64>(), Ok(number));
    }

    #[test]
    fn try_from_is_the_same_narrowing() {
        let mut registry = Registry::new();

        let label = registry.insert("tag".to_string());
        let generic: RegistryHandle = label.into();

        assert_eq!(Handle::<String>::try_from(generic), Ok(label));
        assert_eq!(
            Handle::<i64>::try_from(generic),
            Err(TypeMismatch::new(
                type_name::<i64>(),
                type_name::<String>()
            ))
        );
    }

    #[test]
    fn generic_handle_equality_requires_same_tag_and_handle() {
        let mut registry = Registry::new();

        let first = registry.insert(1_i64);
        let second = registry.insert(2_i64);
        let label = registry.insert("a".to_string());

        let erased_first = RegistryHandle::from(first);

        assert_eq!(erased_first, RegistryHandle::from(first));
        assert_ne!(erased_first, RegistryHandle::from(second));
        assert_ne!(erased_first, RegistryHandle::from(label));
    }

    #[test]
    fn erase_any_resolves_the_active_tag() {
        let mut registry = Registry::new();

        let number = registry.insert(5_i64);
        let label = registry.insert("x".to_string());

        let erased: Vec<RegistryHandle> = vec![number.into(), label.into()];

        for handle in &erased {
            registry.erase_any(*handle).expect("handles are live");
        }

        assert!(registry.is_empty());
        assert_eq!(registry.erase_any(erased[0]), Err(BucketError::SlotErased { index: 0 }));
    }

    #[test]
    fn is_valid_any_tracks_liveness() {
        let mut registry = Registry::new();

        let number = registry.insert(5_i64);
        let generic = RegistryHandle::from(number);

        assert!(registry.is_valid_any(generic));
        assert!(!generic.is_sentinel());

        assert_eq!(registry.erase(number), Ok(5));
        assert!(!registry.is_valid_any(generic));
    }

    #[test]
    fn sentinel_handles_stay_invalid_through_erasure() {
        let registry = Registry::new();

        let generic = RegistryHandle::from(Handle::<i64>::default());

        assert!(generic.is_sentinel());
        assert!(!registry.is_valid_any(generic));
    }

    #[test]
    fn len_is_the_sum_of_per_type_counts() {
        let mut registry = Registry::new();

        for n in 0..7_i64 {
            _ = registry.insert(n);
        }
        for n in 0..4 {
            _ = registry.insert(format!("label {n}"));
        }

        assert_eq!(registry.len_of::<i64>(), 7);
        assert_eq!(registry.len_of::<String>(), 4);
        assert_eq!(registry.len(), 11);
    }

    #[test]
    fn buckets_do_not_leak_into_each_other() {
        let mut registry = Registry::new();

        let number = registry.insert(1_i64);

        // Inserting and erasing labels leaves the number bucket untouched.
        let labels: Vec<_> = (0..10).map(|n| registry.insert(format!("{n}"))).collect();
        for label in labels {
            _ = registry.erase(label).expect("label is live");
        }

        assert_eq!(registry.len_of::<i64>(), 1);
        assert!(registry.is_valid(number));
        assert_eq!(registry.get(number), Ok(&1));
    }

    #[test]
    fn type_index_follows_declaration_order() {
        assert_eq!(Registry::TYPE_COUNT, 2);
        assert_eq!(Registry::type_index_of::<i64>(), 0);
        assert_eq!(Registry::type_index_of::<String>(), 1);

        assert_eq!(Registry::type_name_at(0), Some(type_name::<i64>()));
        assert_eq!(Registry::type_name_at(1), Some(type_name::<String>()));
        assert_eq!(Registry::type_name_at(2), None);

        let mut registry = Registry::new();
        let number = registry.insert(3_i64);
        assert_eq!(RegistryHandle::from(number).type_index(), 0);
    }

    #[test]
    fn views_traverse_one_type_only() {
        let mut registry = Registry::new();

        _ = registry.insert(1_i64);
        _ = registry.insert(2_i64);
        _ = registry.insert("skip".to_string());

        let mut total = 0;
        for number in registry.view::<i64>() {
            total += number;
        }
        assert_eq!(total, 3);

        for label in registry.view_mut::<String>() {
            label.push('!');
        }
        assert_eq!(
            registry.iter::<String>().map(String::as_str).collect::<Vec<_>>(),
            ["skip!"]
        );
    }

    #[test]
    fn get_and_get_mut_reach_the_object() {
        let mut registry = Registry::new();

        let label = registry.insert("grow".to_string());

        registry
            .get_mut(label)
            .expect("handle is live")
            .push_str("ing");

        assert_eq!(registry.get(label).map(String::as_str), Ok("growing"));
    }

    #[test]
    fn clear_empties_every_bucket_and_kills_handles() {
        let mut registry = Registry::new();

        let number = registry.insert(1_i64);
        _ = registry.insert("x".to_string());

        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.is_valid(number));
    }

    #[test]
    fn configured_block_capacity_reaches_every_bucket() {
        let mut registry = Registry::with_first_block_capacity(nz!(2));

        let early: Vec<_> = (0..3_i64).map(|n| registry.insert(n)).collect();

        // Push both buckets through several growths.
        for n in 3..100_i64 {
            _ = registry.insert(n);
        }
        for n in 0..100 {
            _ = registry.insert(format!("{n}"));
        }

        for (n, handle) in early.iter().enumerate() {
            assert_eq!(registry.get(*handle), Ok(&i64::try_from(n).unwrap()));
        }
    }

    #[test]
    fn single_type_store_narrows_without_a_mismatch_arm() {
        let mut solo = Solo::new();

        let only = solo.insert(42_u8);
        let generic = SoloHandle::from(only);

        assert_eq!(generic.narrow::<u8>(), Ok(only));
        assert_eq!(solo.len(), 1);
    }

    #[test]
    fn debug_output_names_the_store_and_fields() {
        let mut registry = Registry::new();
        _ = registry.insert(1_i64);

        let rendered = format!("{registry:?}");
        assert!(rendered.contains("Registry"));
        assert!(rendered.contains("number"));
        assert!(rendered.contains("label"));
    }
}
