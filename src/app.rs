use crate::api::use_api;
use crate::auth::SessionProvider;
use crate::components::NavItems;
use crate::routes::*;
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    // Provides the shared client before anything below asks for it.
    use_api();

    view! {
        <Stylesheet id="ionicons" href="https://code.ionicframework.com/ionicons/2.0.1/css/ionicons.min.css"/>
        <Stylesheet id="google-fonts" href="https://fonts.googleapis.com/css?family=Titillium+Web:700|Source+Serif+Pro:400,700|Merriweather+Sans:400,700|Source+Sans+Pro:400,300,600,700,300italic,400italic,600italic,700italic"/>
        <Stylesheet id="main-css" href="https://demo.productionready.io/main.css"/>
        <Stylesheet id="app-css" href="/pkg/devspace-web.css"/>

        <Title text="DevSpace"/>

        <SessionProvider>
            <Router>
                <nav class="navbar navbar-light">
                    <div class="container">
                        <A class="navbar-brand" href="/" exact=true>
                            "DevSpace"
                        </A>
                        <ul class="nav navbar-nav pull-xs-right">
                            <NavItems/>
                        </ul>
                    </div>
                </nav>

                <main>
                    <Routes>
                        <Route path="/" view=HomePage/>
                        <Route path="/articles" view=HomePage/>
                        <Route path="/articles/:id" view=Article/>
                        <Route path="/profile/:id?" view=Profile/>
                    </Routes>
                </main>

                <footer>
                    <div class="container">
                        <A href="/" class="logo-font">
                            "DevSpace"
                        </A>
                        <span class="attribution">
                            "A place for developers to write, discuss and keep track of their work."
                        </span>
                    </div>
                </footer>
            </Router>
        </SessionProvider>
    }
}
