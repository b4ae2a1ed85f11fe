use clap::Parser;
use folio_viewer::display::{page_scroll_id, PageSurface};
use folio_viewer::{bindings, Action, Cli, KeyChord, PdfRenderer, StatusBar, ViewerSession};
use iced::{
    keyboard,
    widget::{column, container, image as img, scrollable, text},
    Element, Length, Subscription, Task, Theme,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("folio_viewer=debug,info")),
        )
        .init();

    iced::application(Viewer::title, Viewer::update, Viewer::view)
        .subscription(Viewer::subscription)
        .theme(|_| Theme::Dark)
        .run_with(move || Viewer::new(cli))
}

#[derive(Debug, Clone)]
enum Message {
    Action(Action),
    FileChosen(Option<PathBuf>),
    Scrolled(scrollable::Viewport),
}

struct Viewer {
    session: ViewerSession<PdfRenderer, PageSurface, StatusBar>,
}

impl Viewer {
    fn new(cli: Cli) -> (Self, Task<Message>) {
        let engine = match &cli.pdfium_dir {
            Some(dir) => PdfRenderer::with_library_dir(dir),
            None => PdfRenderer::new(),
        };
        let session = ViewerSession::new(
            engine,
            PageSurface::new(),
            StatusBar::new(),
            cli.viewer_config(),
        );
        let mut viewer = Self { session };

        let task = match cli.file.clone() {
            Some(path) => viewer.open(path, cli.start_page()),
            None => Task::none(),
        };
        (viewer, task)
    }

    fn title(&self) -> String {
        match self.session.document_path().and_then(|path| path.file_name()) {
            Some(name) => format!("{} - Folio Viewer", name.to_string_lossy()),
            None => "Folio Viewer".to_string(),
        }
    }

    fn open(&mut self, path: PathBuf, start_page: usize) -> Task<Message> {
        match self.session.open(&path, start_page) {
            Err(err) if err.is_fatal() => iced::exit(),
            _ => self.session.display().scroll_task(),
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Action(Action::OpenFile) => Task::perform(pick_file(), Message::FileChosen),
            Message::Action(action) => {
                if let Err(err) = self.session.dispatch(action) {
                    if err.is_fatal() {
                        return iced::exit();
                    }
                }
                match action {
                    Action::ScrollDown
                    | Action::ScrollUp
                    | Action::ScrollLeft
                    | Action::ScrollRight => self.session.display().scroll_task(),
                    _ => Task::none(),
                }
            }
            Message::FileChosen(Some(path)) => self.open(path, 0),
            Message::FileChosen(None) => Task::none(),
            Message::Scrolled(viewport) => {
                self.session.display_mut().sync_viewport(viewport);
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let page: Element<Message> = match self.session.display().image() {
            Some(handle) => scrollable(container(img(handle.clone())))
                .id(page_scroll_id())
                .direction(scrollable::Direction::Both {
                    vertical: scrollable::Scrollbar::default(),
                    horizontal: scrollable::Scrollbar::default(),
                })
                .on_scroll(Message::Scrolled)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text("Press Ctrl+O to open a document").size(16))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        column![page, text(self.session.status().summary()).size(14)]
            .spacing(5)
            .padding(10)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(key_to_message)
    }
}

fn key_to_message(key: keyboard::Key, modifiers: keyboard::Modifiers) -> Option<Message> {
    let keyboard::Key::Character(text) = key.as_ref() else {
        return None;
    };
    let mut chars = text.chars();
    let (Some(ch), None) = (chars.next(), chars.next()) else {
        return None;
    };
    bindings::lookup(KeyChord::new(ch, modifiers.shift(), modifiers.command()))
        .map(Message::Action)
}

async fn pick_file() -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Open file")
        .add_filter("PDF Files", &["pdf"])
        .add_filter("Images", &["png", "jpg", "jpeg"])
        .pick_file()
        .await
        .map(|file| file.path().to_path_buf())
}
