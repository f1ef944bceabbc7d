//! Platform trait implementations for WebApp

use divergence_core::DashboardPlatform;
use eframe::egui;

use crate::app::WebApp;
use crate::storage::open_in_new_tab;

impl DashboardPlatform for WebApp {
    fn avatar_source(&self, url: &str) -> egui::ImageSource<'static> {
        // GitHub serves avatars with CORS headers, so the http loader can fetch them directly
        egui::ImageSource::Uri(url.to_string().into())
    }

    fn open_url(&self, url: &str) {
        open_in_new_tab(url);
    }
}
