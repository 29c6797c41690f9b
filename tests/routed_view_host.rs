//! Integration tests for the routed view host and view lookup

mod common;

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{HomeViewModel, SettingsViewModel};
use viewbind::{AsAny, Error};
use viewbind::routing::{
    PanelView, RoutedViewHost, RoutingState, ScreenId, ViewFor, ViewKey, ViewLocator, ViewRegistry,
};
use viewbind::ui::{Dock, Label, UiDispatcher, Widget};

fn view(name: &'static str, dispatcher: &UiDispatcher) -> anyhow::Result<Arc<dyn ViewFor>> {
    let view: Arc<dyn ViewFor> = PanelView::new(name, dispatcher.clone());
    Ok(view)
}

fn content_name(host: &RoutedViewHost) -> Option<String> {
    host.content()
        .and_then(|content| content.control().map(|control| control.name().to_string()))
}

struct Fixture {
    dispatcher: UiDispatcher,
    views: Arc<ViewRegistry>,
    locator: Arc<ViewLocator>,
    router: Arc<RoutingState>,
    host: Arc<RoutedViewHost>,
    errors: Arc<Mutex<Vec<String>>>,
    screen: ScreenId,
}

impl Fixture {
    fn new() -> Self {
        let dispatcher = UiDispatcher::for_current_thread();
        let views = Arc::new(ViewRegistry::new());
        let locator = Arc::new(ViewLocator::new(Arc::clone(&views)));
        let router = RoutingState::new();
        let host = RoutedViewHost::new("host", dispatcher.clone(), Arc::clone(&locator));

        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        host.set_exception_handler(move |err| sink.lock().push(err.to_string()));

        Self {
            dispatcher,
            views,
            locator,
            router,
            host,
            errors,
            screen: ScreenId::new(),
        }
    }

    fn register_home(&self, name: &'static str) -> Arc<AtomicUsize> {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let d = self.dispatcher.clone();
        self.views.register_view_for::<HomeViewModel, _>(None, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            view(name, &d)
        });
        built
    }
}

#[test]
fn test_default_content_when_stack_is_empty() {
    let fx = Fixture::new();
    let placeholder: Arc<dyn Widget> = Label::new("placeholder", fx.dispatcher.clone());
    fx.host.set_default_content(Some(placeholder));
    fx.host.set_router(Some(Arc::clone(&fx.router)));

    assert_eq!(content_name(&fx.host), None);

    fx.host.create_handle();
    assert_eq!(content_name(&fx.host).as_deref(), Some("placeholder"));
}

#[test]
fn test_view_swap_waits_for_handle() {
    let fx = Fixture::new();
    let built = fx.register_home("home-view");
    fx.host.set_router(Some(Arc::clone(&fx.router)));

    let home = HomeViewModel::new("home", fx.screen);
    fx.router.navigate(home.clone()).unwrap();
    assert_eq!(content_name(&fx.host), None);
    assert_eq!(built.load(Ordering::SeqCst), 0);

    fx.host.create_handle();

    let content = fx.host.content().unwrap();
    let control = content.control().unwrap();
    assert_eq!(control.name(), "home-view");
    assert_eq!(control.dock(), Dock::Fill);
    assert_eq!(fx.host.core().children().len(), 1);

    let shown = (*content).as_any().downcast_ref::<PanelView>().unwrap();
    assert_eq!(shown.view_model().unwrap().url_path_segment(), "home");
}

#[test]
fn test_navigation_swaps_and_back_restores() {
    let fx = Fixture::new();
    fx.register_home("home-view");
    let d = fx.dispatcher.clone();
    fx.views
        .register_view_for::<SettingsViewModel, _>(None, move || view("settings-view", &d));

    fx.host.create_handle();
    fx.host.set_router(Some(Arc::clone(&fx.router)));

    fx.router.navigate(HomeViewModel::new("home", fx.screen)).unwrap();
    assert_eq!(content_name(&fx.host).as_deref(), Some("home-view"));

    fx.router.navigate(SettingsViewModel::new(fx.screen)).unwrap();
    assert_eq!(content_name(&fx.host).as_deref(), Some("settings-view"));

    fx.router.navigate_back();
    assert_eq!(content_name(&fx.host).as_deref(), Some("home-view"));
    assert!(fx.errors.lock().is_empty());
}

#[test]
fn test_reset_resolves_a_single_view() {
    let fx = Fixture::new();
    let built = fx.register_home("home-view");
    fx.host.create_handle();
    fx.host.set_router(Some(Arc::clone(&fx.router)));
    fx.router.navigate(HomeViewModel::new("a", fx.screen)).unwrap();
    fx.router.navigate(HomeViewModel::new("b", fx.screen)).unwrap();
    let before = built.load(Ordering::SeqCst);

    fx.router.navigate_and_reset(HomeViewModel::new("c", fx.screen)).unwrap();

    assert_eq!(built.load(Ordering::SeqCst), before + 1);
    assert_eq!(fx.router.url_for_current_route(), "app://c");
}

#[test]
fn test_refused_back_keeps_current_view() {
    let fx = Fixture::new();
    let built = fx.register_home("home-view");
    fx.host.create_handle();
    fx.host.set_router(Some(Arc::clone(&fx.router)));
    fx.router.navigate(HomeViewModel::new("home", fx.screen)).unwrap();
    let shown = fx.host.content().unwrap();
    let before = built.load(Ordering::SeqCst);

    assert!(!fx.router.navigate_back());

    assert_eq!(built.load(Ordering::SeqCst), before);
    assert!(Arc::ptr_eq(&fx.host.content().unwrap(), &shown));
}

#[test]
fn test_missing_view_goes_to_exception_sink() {
    let fx = Fixture::new();
    fx.host.create_handle();
    fx.host.set_router(Some(Arc::clone(&fx.router)));

    fx.router.navigate(SettingsViewModel::new(fx.screen)).unwrap();

    let errors = fx.errors.lock();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("SettingsViewModel"));
    assert_eq!(content_name(&fx.host), None);
}

#[test]
fn test_missing_view_uses_process_sink_by_default() {
    let dispatcher = UiDispatcher::for_current_thread();
    let locator = Arc::new(ViewLocator::new(Arc::new(ViewRegistry::new())));
    let host = RoutedViewHost::new("bare", dispatcher, locator);
    let router = RoutingState::new();
    host.create_handle();

    let reported = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&reported);
    viewbind::exception::set_default_exception_handler(move |err| {
        if matches!(err, Error::ViewNotFound { .. }) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    host.set_router(Some(Arc::clone(&router)));
    router.navigate(HomeViewModel::new("home", ScreenId::new())).unwrap();
    viewbind::exception::reset_default_exception_handler();

    assert_eq!(reported.load(Ordering::SeqCst), 1);
}

#[test]
fn test_swapping_router_ignores_the_old_one() {
    let fx = Fixture::new();
    fx.register_home("home-view");
    fx.host.create_handle();
    fx.host.set_router(Some(Arc::clone(&fx.router)));
    fx.router.navigate(HomeViewModel::new("old", fx.screen)).unwrap();

    let replacement = RoutingState::new();
    fx.host.set_router(Some(Arc::clone(&replacement)));
    assert_eq!(content_name(&fx.host), None);

    fx.router.navigate(HomeViewModel::new("old-2", fx.screen)).unwrap();
    assert_eq!(content_name(&fx.host), None);

    replacement.navigate(HomeViewModel::new("new", fx.screen)).unwrap();
    let content = fx.host.content().unwrap();
    let shown = (*content).as_any().downcast_ref::<PanelView>().unwrap();
    assert_eq!(shown.view_model().unwrap().url_path_segment(), "new");
    assert!(Arc::ptr_eq(&fx.host.router().unwrap(), &replacement));
}

#[test]
fn test_background_navigation_is_marshalled() {
    let fx = Fixture::new();
    fx.register_home("home-view");
    fx.host.create_handle();
    fx.host.set_router(Some(Arc::clone(&fx.router)));

    let router = Arc::clone(&fx.router);
    let screen = fx.screen;
    std::thread::spawn(move || router.navigate(HomeViewModel::new("remote", screen)))
        .join()
        .unwrap()
        .unwrap();

    assert_eq!(content_name(&fx.host), None);
    assert_eq!(fx.dispatcher.pending(), 1);

    fx.dispatcher.pump();
    assert_eq!(content_name(&fx.host).as_deref(), Some("home-view"));
}

#[test]
fn test_name_transform_wins_over_view_for() {
    let fx = Fixture::new();
    fx.register_home("generic-view");
    let d = fx.dispatcher.clone();
    let concrete = fx.locator.view_type_name(std::any::type_name::<HomeViewModel>());
    fx.views.register_view(&concrete, None, move || view("concrete-view", &d));

    let resolved = fx
        .locator
        .resolve_view(HomeViewModel::new("home", fx.screen).as_ref())
        .unwrap();

    assert_eq!(resolved.control().unwrap().name(), "concrete-view");
}

#[test]
fn test_interface_name_is_second_choice() {
    let fx = Fixture::new();
    fx.register_home("generic-view");
    let d = fx.dispatcher.clone();
    let interface = fx.locator.interface_name(std::any::type_name::<HomeViewModel>());
    fx.views
        .register(ViewKey::ViewFor(interface), None, move || view("interface-view", &d));

    let resolved = fx
        .locator
        .resolve_view(HomeViewModel::new("home", fx.screen).as_ref())
        .unwrap();

    assert_eq!(resolved.control().unwrap().name(), "interface-view");
}

#[test]
fn test_failing_factory_falls_through() {
    let fx = Fixture::new();
    fx.register_home("generic-view");
    let concrete = fx.locator.view_type_name(std::any::type_name::<HomeViewModel>());
    fx.views
        .register_view(&concrete, None, || Err(anyhow::anyhow!("designer file missing")));

    let resolved = fx
        .locator
        .resolve_view(HomeViewModel::new("home", fx.screen).as_ref())
        .unwrap();

    assert_eq!(resolved.control().unwrap().name(), "generic-view");
}

#[test]
fn test_contract_selects_registration() {
    let fx = Fixture::new();
    let d = fx.dispatcher.clone();
    fx.views
        .register_view_for::<SettingsViewModel, _>(None, move || view("settings-view", &d));
    let d = fx.dispatcher.clone();
    fx.views
        .register_view_for::<SettingsViewModel, _>(Some("compact"), move || view("compact-view", &d));

    let plain = fx.locator.resolve_view(SettingsViewModel::new(fx.screen).as_ref()).unwrap();
    let compact = fx
        .locator
        .resolve_view(SettingsViewModel::with_contract(fx.screen, "compact").as_ref())
        .unwrap();
    let unknown = fx
        .locator
        .resolve_view(SettingsViewModel::with_contract(fx.screen, "wide").as_ref());

    assert_eq!(plain.control().unwrap().name(), "settings-view");
    assert_eq!(compact.control().unwrap().name(), "compact-view");
    assert!(matches!(unknown, Err(Error::ViewNotFound { .. })));
}
