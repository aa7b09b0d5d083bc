//! Canonical resource actions and route shapes.

use std::{fmt::Display, str::FromStr};

/// One of the six canonical actions a resource may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Create a new item in the collection.
    Create,

    /// List the items of the collection.
    List,

    /// Retrieve a single item.
    Retrieve,

    /// Replace a single item.
    Update,

    /// Partially update a single item.
    PartialUpdate,

    /// Destroy a single item.
    Destroy,
}

impl Action {
    /// All the actions, in declaration order.
    pub const ALL: [Action; 6] = [
        Self::Create,
        Self::List,
        Self::Retrieve,
        Self::Update,
        Self::PartialUpdate,
        Self::Destroy,
    ];

    /// Get the HTTP method that triggers this action.
    pub fn method(self) -> http::Method {
        match self {
            Self::Create => http::Method::POST,
            Self::List | Self::Retrieve => http::Method::GET,
            Self::Update => http::Method::PUT,
            Self::PartialUpdate => http::Method::PATCH,
            Self::Destroy => http::Method::DELETE,
        }
    }

    /// Get the name of the action, as used for the action method names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::List => "list",
            Self::Retrieve => "retrieve",
            Self::Update => "update",
            Self::PartialUpdate => "partial_update",
            Self::Destroy => "destroy",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error returned when parsing an unknown action name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action `{0}`")]
pub struct UnknownActionError(pub String);

impl FromStr for Action {
    type Err = UnknownActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownActionError(s.to_string()))
    }
}

/// A set of actions.
///
/// This is the capability set a resource declares: an action is implemented if and only if it
/// belongs to the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActionSet(u8);

impl ActionSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// The set containing every action.
    pub const ALL: Self = Self(0b11_1111);

    /// Get a new set with the specified action added.
    ///
    /// Usable in const contexts, which is what the `resource` attribute macro relies on.
    pub const fn with(self, action: Action) -> Self {
        Self(self.0 | action.bit())
    }

    /// Add an action to the set.
    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    /// Check whether the set contains an action.
    pub const fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    /// Get the actions present in both sets.
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Get the actions present in either set.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the actions in the set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Action> {
        Action::ALL
            .into_iter()
            .filter(move |action| self.contains(*action))
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl<const N: usize> From<[Action; N]> for ActionSet {
    fn from(actions: [Action; N]) -> Self {
        actions.into_iter().collect()
    }
}

/// The shape of a route: whether it addresses the whole collection or a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteShape {
    /// The collection route (e.g. `/users`).
    Collection,

    /// The item route (e.g. `/users/<user_id:int>`).
    Item,
}

impl RouteShape {
    /// All the shapes, in registration order.
    pub const ALL: [RouteShape; 2] = [Self::Collection, Self::Item];

    /// Get the actions that belong to this shape, in order.
    pub const fn actions(self) -> &'static [Action] {
        match self {
            Self::Collection => &[Action::List, Action::Create],
            Self::Item => &[
                Action::Retrieve,
                Action::Update,
                Action::PartialUpdate,
                Action::Destroy,
            ],
        }
    }

    /// Get the action answering `GET` requests on this shape.
    pub const fn get_action(self) -> Action {
        match self {
            Self::Collection => Action::List,
            Self::Item => Action::Retrieve,
        }
    }

    /// Get the name of the shape.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Item => "item",
        }
    }
}

impl Display for RouteShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_actions() {
        assert_eq!(
            RouteShape::Collection.actions(),
            &[Action::List, Action::Create]
        );
        assert_eq!(
            RouteShape::Item.actions(),
            &[
                Action::Retrieve,
                Action::Update,
                Action::PartialUpdate,
                Action::Destroy
            ]
        );
    }

    #[test]
    fn test_action_methods() {
        assert_eq!(Action::Create.method(), http::Method::POST);
        assert_eq!(Action::List.method(), http::Method::GET);
        assert_eq!(Action::Retrieve.method(), http::Method::GET);
        assert_eq!(Action::Update.method(), http::Method::PUT);
        assert_eq!(Action::PartialUpdate.method(), http::Method::PATCH);
        assert_eq!(Action::Destroy.method(), http::Method::DELETE);
    }

    #[test]
    fn test_every_action_belongs_to_exactly_one_shape() {
        for action in Action::ALL {
            let count = RouteShape::ALL
                .iter()
                .filter(|shape| shape.actions().contains(&action))
                .count();

            assert_eq!(count, 1, "{action} belongs to {count} shapes");
        }
    }

    #[test]
    fn test_action_names_roundtrip() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }

        assert_eq!(
            "partial-update".parse::<Action>(),
            Err(UnknownActionError("partial-update".to_string()))
        );
    }

    #[test]
    fn test_action_set() {
        let set = ActionSet::from([Action::Create, Action::List, Action::Destroy]);

        assert!(set.contains(Action::Create));
        assert!(!set.contains(Action::Update));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Action::Create, Action::List, Action::Destroy]
        );

        let item: ActionSet = RouteShape::Item.actions().iter().copied().collect();
        assert_eq!(set.intersection(item), ActionSet::from([Action::Destroy]));
        assert_eq!(set.union(ActionSet::ALL), ActionSet::ALL);
        assert!(ActionSet::EMPTY.is_empty());
        assert_eq!(ActionSet::ALL.iter().count(), 6);
    }
}
