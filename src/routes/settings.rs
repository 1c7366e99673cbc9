use crate::api::{use_api, Api};
use crate::auth::{redirect_to_login, use_session};
use crate::models::{ProfileUpdate, UserProfile};
use leptos::*;
use std::time::Duration;

const SAVED_MESSAGE: &str = "Profile updated successfully";

/// Checks the edited fields in the order the form shows them.
pub(crate) fn validate(
    profile: &UserProfile,
    username: String,
    email: String,
    bio: String,
) -> Result<ProfileUpdate, String> {
    Ok(ProfileUpdate::from_profile(profile)
        .set_username(username)?
        .set_email(email)?
        .set_bio(bio))
}

#[derive(Clone, Debug, PartialEq)]
enum FormState {
    Editing,
    Saving,
    Saved,
    Failed(String),
}

/// Edit form for the viewer's own profile. Goes back to the read-only
/// view a moment after a successful save.
#[component]
pub fn ProfileEditor(profile: UserProfile, editing: RwSignal<bool>) -> impl IntoView {
    let session = use_session();
    let api = store_value(use_api());
    let original = store_value(profile.clone());
    let username = create_rw_signal(profile.username.clone());
    let email = create_rw_signal(profile.email.clone().unwrap_or_default());
    let bio = create_rw_signal(profile.bio.clone().unwrap_or_default());
    let state = create_rw_signal(FormState::Editing);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let update = original.with_value(|profile| {
            validate(
                profile,
                username.get_untracked(),
                email.get_untracked(),
                bio.get_untracked(),
            )
        });
        let update = match update {
            Ok(update) => update,
            Err(msg) => {
                state.set(FormState::Failed(msg));
                return;
            }
        };

        state.set(FormState::Saving);
        spawn_local(async move {
            match api.get_value().update_profile(&update).await {
                Ok(updated) => {
                    tracing::info!("profile of {} updated", updated.username);
                    state.set(FormState::Saved);
                    // The header re-renders from the session, so it only
                    // changes once the confirmation has been seen.
                    set_timeout(
                        move || {
                            session.viewer.update(|viewer| match viewer {
                                Some(viewer) => {
                                    viewer.username = updated.username;
                                    viewer.email = updated.email;
                                    viewer.bio = updated.bio;
                                }
                                None => *viewer = Some(updated),
                            });
                            editing.set(false);
                        },
                        Duration::from_millis(1500),
                    );
                }
                Err(err) if err.is_not_authenticated() => redirect_to_login(),
                Err(err) => {
                    tracing::error!("profile update failed: {err}");
                    state.set(FormState::Failed(err.user_message()));
                }
            }
        });
    };

    let busy = move || matches!(state.get(), FormState::Saving | FormState::Saved);

    view! {
        <div class="settings-form">
            {move || match state.get() {
                FormState::Saved => view! {
                    <div class="alert alert-success" role="alert">{SAVED_MESSAGE}</div>
                }
                .into_view(),
                FormState::Failed(msg) => view! {
                    <div class="alert alert-danger">{msg}</div>
                }
                .into_view(),
                FormState::Editing | FormState::Saving => ().into_view(),
            }}

            <form on:submit=on_submit>
                <fieldset disabled=busy>
                    <fieldset class="form-group">
                        <input
                            class="form-control form-control-lg"
                            type="text"
                            placeholder="Username"
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                    </fieldset>
                    <fieldset class="form-group">
                        <input
                            class="form-control form-control-lg"
                            type="email"
                            placeholder="Email"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                    </fieldset>
                    <fieldset class="form-group">
                        <textarea
                            class="form-control form-control-lg"
                            rows="5"
                            placeholder="Short bio about you"
                            prop:value=move || bio.get()
                            on:input=move |ev| bio.set(event_target_value(&ev))
                        ></textarea>
                    </fieldset>
                    <button class="btn btn-lg btn-primary pull-xs-right" type="submit">
                        {move || if state.get() == FormState::Saving { "Saving..." } else { "Save" }}
                    </button>
                    " "
                    <button
                        class="btn btn-lg btn-outline-secondary"
                        type="button"
                        on:click=move |_| editing.set(false)
                    >
                        "Cancel"
                    </button>
                </fieldset>
            </form>
        </div>
    }
}

#[cfg(feature = "hydrate")]
async fn read_avatar(file: web_sys::File) -> Result<crate::models::AvatarUpload, String> {
    crate::models::AvatarUpload::check_size(file.size() as usize)?;
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|err| format!("Could not read the image: {err:?}"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    crate::models::AvatarUpload::new(file.name(), file.type_(), bytes)
}

/// File picker that replaces the viewer's avatar. JPEG and PNG only, up
/// to 2MB; bad files are refused before any upload.
#[component]
pub fn AvatarUploader() -> impl IntoView {
    let session = use_session();
    let api = store_value(use_api());
    let uploading = create_rw_signal(false);
    let error = create_rw_signal(None::<String>);

    let on_change = move |ev: ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;

            let Some(input) = ev
                .target()
                .and_then(|x| x.dyn_into::<web_sys::HtmlInputElement>().ok())
            else {
                return;
            };
            let Some(file) = input.files().and_then(|x| x.get(0)) else {
                return;
            };
            error.set(None);
            uploading.set(true);
            spawn_local(async move {
                let result = match read_avatar(file).await {
                    Ok(avatar) => api
                        .get_value()
                        .upload_avatar(avatar)
                        .await
                        .map_err(|err| err.user_message()),
                    Err(msg) => Err(msg),
                };
                match result {
                    Ok(url) => {
                        tracing::info!("avatar stored at {url}");
                        session.viewer.update(|x| {
                            if let Some(x) = x {
                                x.avatar_url = Some(url);
                            }
                        });
                    }
                    Err(msg) => error.set(Some(msg)),
                }
                uploading.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (ev, session, api, uploading);
        }
    };

    view! {
        <div class="avatar-upload">
            <label class="btn btn-sm btn-outline-secondary">
                {move || if uploading.get() { "Uploading..." } else { "Change avatar" }}
                <input
                    type="file"
                    accept="image/jpeg,image/png"
                    style="display:none"
                    disabled=move || uploading.get()
                    on:change=on_change
                />
            </label>
            {move || error.get().map(|msg| view! { <p class="error-messages">{msg}</p> })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_stops_at_the_first_bad_field() {
        let profile = UserProfile {
            username: "ferris".into(),
            ..Default::default()
        };
        let short = validate(&profile, "fe".into(), "bad".into(), String::new());
        assert!(short.unwrap_err().contains("too short"));

        let email = validate(&profile, "ferris".into(), "bad".into(), String::new());
        assert!(email.unwrap_err().contains("invalid"));

        let ok = validate(&profile, " crab ".into(), "crab@rust.dev".into(), " hi ".into()).unwrap();
        assert_eq!(ok.username(), "crab");
        assert_eq!(ok.bio(), "hi");
    }
}
