use shared::{
    domain::{Resource, ResourceId, SortDirection, SortField, SortFields},
    protocol::{ListQuery, NavigationLink},
};

/// Sorting and paging defaults for a freshly created controller.
#[derive(Debug, Clone)]
pub struct ListConfig {
    pub sort_fields: SortFields,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page_size: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        let sort_fields = SortFields::default();
        let sort_field = sort_fields.field_or_first("lastName");
        Self {
            sort_fields,
            sort_field,
            sort_direction: SortDirection::Asc,
            page_size: 5,
        }
    }
}

/// One immutable snapshot of the list. The controller swaps whole snapshots;
/// nothing outside it patches fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    pub loading: bool,
    pub resources: Vec<Resource>,
    pub links: Vec<NavigationLink>,
    pub current_page: u32,
    /// `None` until the server has reported it.
    pub last_page: Option<u32>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page_size: u32,
}

impl ListState {
    pub fn initial(config: &ListConfig) -> Self {
        Self {
            loading: true,
            resources: Vec::new(),
            links: Vec::new(),
            current_page: 1,
            last_page: None,
            sort_field: config.sort_field.clone(),
            sort_direction: config.sort_direction,
            page_size: config.page_size.max(1),
        }
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.current_page,
            per_page: self.page_size,
            sort_by: self.sort_field.clone(),
            sort_dir: self.sort_direction,
        }
    }

    pub fn find(&self, id: &ResourceId) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|resource| resource.id.as_ref() == Some(id))
    }

    /// True once a load has finished with nothing to show.
    pub fn shows_empty_notice(&self) -> bool {
        !self.loading && self.resources.is_empty()
    }
}
