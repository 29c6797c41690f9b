use anyhow::{Context, Result};
use clap::Args;
use log::info;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;

use viewbind::reactive::{NotifyPropertyChanged, PropertyBag, PropertyChange, Subject, Subscription};
use viewbind::routing::{
    PanelView, RoutableViewModel, RoutedViewHost, RoutingState, ScreenId, ScreenRegistry, ViewFor,
    ViewLocator, ViewModel, ViewRegistry, when_navigated_to,
};
use viewbind::ui::{Button, HasEnabledFlag, HasTextValue, Label, TextBox, UiDispatcher, Widget};
use viewbind::{Binder, ProviderRegistry, Settings};

#[derive(Args)]
pub struct DemoCommand {
    /// Settings file (defaults to the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

struct HomeViewModel {
    screen: ScreenId,
    properties: PropertyBag,
}

impl HomeViewModel {
    fn new(screen: ScreenId) -> Arc<Self> {
        Arc::new(Self {
            screen,
            properties: PropertyBag::new().with("Greeting", json!("")),
        })
    }
}

impl ViewModel for HomeViewModel {
    fn as_routable(self: Arc<Self>) -> Option<Arc<dyn RoutableViewModel>> {
        Some(self)
    }
}

impl RoutableViewModel for HomeViewModel {
    fn url_path_segment(&self) -> String {
        "home".to_string()
    }

    fn host_screen(&self) -> ScreenId {
        self.screen
    }
}

impl NotifyPropertyChanged for HomeViewModel {
    fn get_property(&self, name: &str) -> Option<Value> {
        self.properties.get(name)
    }

    fn set_property(&self, name: &str, value: Value) -> viewbind::Result<()> {
        self.properties.set_property(name, value)
    }

    fn property_changed(&self) -> &Subject<PropertyChange> {
        self.properties.changed()
    }
}

struct SettingsViewModel {
    screen: ScreenId,
}

impl ViewModel for SettingsViewModel {
    fn as_routable(self: Arc<Self>) -> Option<Arc<dyn RoutableViewModel>> {
        Some(self)
    }
}

impl RoutableViewModel for SettingsViewModel {
    fn url_path_segment(&self) -> String {
        "settings".to_string()
    }

    fn host_screen(&self) -> ScreenId {
        self.screen
    }
}

/// Only has a view under the "compact" contract
struct AboutViewModel {
    screen: ScreenId,
}

impl ViewModel for AboutViewModel {
    fn view_contract(&self) -> Option<&str> {
        Some("compact")
    }

    fn as_routable(self: Arc<Self>) -> Option<Arc<dyn RoutableViewModel>> {
        Some(self)
    }
}

impl RoutableViewModel for AboutViewModel {
    fn url_path_segment(&self) -> String {
        "about".to_string()
    }

    fn host_screen(&self) -> ScreenId {
        self.screen
    }
}

fn panel_view(name: &'static str, dispatcher: &UiDispatcher) -> Result<Arc<dyn ViewFor>> {
    let view: Arc<dyn ViewFor> = PanelView::new(name, dispatcher.clone());
    Ok(view)
}

fn register_views(views: &ViewRegistry, locator: &ViewLocator, dispatcher: &UiDispatcher) {
    let d = dispatcher.clone();
    views.register_view_for::<HomeViewModel, _>(None, move || panel_view("home-view", &d));

    // Found through the name transform
    let d = dispatcher.clone();
    let settings_view = locator.view_type_name(std::any::type_name::<SettingsViewModel>());
    views.register_view(&settings_view, None, move || panel_view("settings-view", &d));

    // Found through the interface name, under a contract
    let d = dispatcher.clone();
    let about_view = locator.interface_name(std::any::type_name::<AboutViewModel>());
    views.register_view_for_name(&about_view, Some("compact"), move || panel_view("about-view", &d));
}

fn print_step(step: &str, router: &RoutingState, host: &RoutedViewHost) {
    let showing = host
        .content()
        .and_then(|content| content.control().map(|control| control.name().to_string()))
        .unwrap_or_else(|| "nothing".to_string());
    println!("{:<24} {:<28} showing {}", step, router.url_for_current_route(), showing);
}

pub async fn demo_command(args: DemoCommand) -> Result<()> {
    let settings = Settings::load_or_default(args.config.as_deref())?;
    let dispatcher = UiDispatcher::for_current_thread();
    info!("Starting demo on UI thread {:?}", std::thread::current().id());

    let binder = Binder::from_settings(Arc::new(ProviderRegistry::with_defaults()), &settings);
    let views = Arc::new(ViewRegistry::new());
    let locator = Arc::new(ViewLocator::from_settings(Arc::clone(&views), &settings));
    register_views(&views, &locator, &dispatcher);

    let router = RoutingState::new();
    let screens = ScreenRegistry::new();
    let screen = screens.register(&router);

    let host = RoutedViewHost::new("main", dispatcher.clone(), Arc::clone(&locator));
    let placeholder: Arc<dyn Widget> = Label::new("placeholder", dispatcher.clone());
    host.set_default_content(Some(placeholder));
    host.set_router(Some(Arc::clone(&router)));

    let back = Button::new("back", dispatcher.clone());
    let open_settings = Button::new("open-settings", dispatcher.clone());
    let greeting = TextBox::new("greeting", dispatcher.clone());
    greeting.set_text("hello");

    let open_settings_command = router.navigate_command_for(move || {
        let view_model: Arc<dyn ViewModel> = Arc::new(SettingsViewModel { screen });
        view_model
    });
    let mut bindings = vec![
        binder.bind_command(router.navigate_back_command(), back.clone(), None)?,
        binder.bind_command(open_settings_command, open_settings.clone(), None)?,
    ];

    print_step("before handle", &router, &host);
    host.create_handle();
    back.core().create_handle();
    open_settings.core().create_handle();
    greeting.core().create_handle();
    print_step("handle created", &router, &host);

    let home = HomeViewModel::new(screen);
    let home_routable: Arc<dyn RoutableViewModel> = home.clone();
    let home_activity = when_navigated_to(&screens, &home_routable, || {
        info!("Home is active");
        Subscription::new(|| info!("Home is no longer active"))
    })?;

    router.navigate(home.clone())?;
    print_step("navigate home", &router, &host);

    bindings.push(binder.bind_property(home.clone(), "Greeting", greeting.clone(), "Text")?);
    greeting.set_text("hello, world");
    println!("greeting in view-model: {}", home.get_property("Greeting").unwrap_or(Value::Null));

    open_settings.click();
    print_step("click open-settings", &router, &host);

    let background = Arc::clone(&router);
    tokio::spawn(async move { background.navigate(Arc::new(AboutViewModel { screen })) })
        .await
        .context("Background navigation task panicked")??;
    print_step("navigate from task", &router, &host);
    let ran = dispatcher.pump();
    print_step(&format!("pumped {} action(s)", ran), &router, &host);

    while back.core().is_enabled() {
        back.click();
        print_step("click back", &router, &host);
    }
    println!("back enabled: {}", back.core().is_enabled());
    println!("{}", serde_json::to_string_pretty(&router.snapshot())?);

    home_activity.unsubscribe();
    for binding in bindings.drain(..) {
        binding.stop();
    }
    Ok(())
}
