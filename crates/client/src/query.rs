//! Query-string types for list endpoints.
//!
//! Every list endpoint paginates with `skip`/`take`. Optional filters are
//! omitted from the query string when unset.

use serde::Serialize;

use casa_core::pagination::PageRequest;
use casa_core::sorting::SortOrder;
use casa_core::types::EntityId;

/// `?skip=&take=&name=&orderBy=` for the students, classes and users lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub skip: u64,
    pub take: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl ListQuery {
    pub fn new(page: &PageRequest, search: &str, order: Option<SortOrder>) -> Self {
        Self {
            skip: page.skip(),
            take: page.take(),
            name: search_filter(search),
            order_by: order.map(SortOrder::name_query),
        }
    }
}

/// `?classId=&skip=&take=&studentName=` for `GET /student-classes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStudentsQuery {
    pub class_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    pub take: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
}

impl ClassStudentsQuery {
    pub fn page(class_id: impl Into<EntityId>, page: &PageRequest, search: &str) -> Self {
        Self {
            class_id: class_id.into(),
            skip: Some(page.skip()),
            take: page.take(),
            student_name: search_filter(search),
        }
    }

    /// A single large fetch, used to build an attendance roster.
    pub fn roster(class_id: impl Into<EntityId>, take: u32, search: &str) -> Self {
        Self {
            class_id: class_id.into(),
            skip: None,
            take,
            student_name: search_filter(search),
        }
    }
}

/// `?classId=&skip=&take=` for `GET /class-attendance`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListQuery {
    pub class_id: EntityId,
    pub skip: u64,
    pub take: u32,
}

impl AttendanceListQuery {
    pub fn new(class_id: impl Into<EntityId>, page: &PageRequest) -> Self {
        Self {
            class_id: class_id.into(),
            skip: page.skip(),
            take: page.take(),
        }
    }
}

/// Trimmed search text, or `None` when blank.
pub fn search_filter(search: &str) -> Option<String> {
    let trimmed = search.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
