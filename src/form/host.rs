/// Callbacks into the view that embeds the form (the listings page)
pub trait AdPanelHost: Send + Sync {
    /// Ask the parent to reload its ad list after a successful save
    fn toggle_refresh_ads(&self);

    /// Open or close the add/edit panel
    fn set_add_unit(&self, open: bool);

    /// Show a blocking message to the user
    fn alert(&self, message: &str);
}
