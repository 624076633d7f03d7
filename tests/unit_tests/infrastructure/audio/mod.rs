mod http_audio_resolver_test;
mod model_loader_factory_test;
