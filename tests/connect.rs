#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::os::fd::FromRawFd;
    use std::thread;

    use vinculum::net::connect_to;
    use vinculum::net::options::{RECV_TIMEOUT, SEND_TIMEOUT};

    #[test]
    fn test_connect_to_configures_the_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("Failed to accept connection");
            let mut buffer = [0; 4];
            stream.read_exact(&mut buffer).expect("Failed to read");
            assert_eq!(&buffer, b"sync");
            stream.write_all(b"ack!").expect("Failed to write");
        });

        let fd = connect_to("127.0.0.1", addr.port()).expect("Failed to connect");
        let mut stream = unsafe { TcpStream::from_raw_fd(fd) };

        assert!(stream.nodelay().expect("Failed to read nodelay"));
        assert_eq!(
            stream.write_timeout().expect("Failed to read send timeout"),
            Some(SEND_TIMEOUT)
        );
        assert_eq!(
            stream.read_timeout().expect("Failed to read recv timeout"),
            Some(RECV_TIMEOUT)
        );

        stream.write_all(b"sync").expect("Failed to write");
        let mut buffer = [0; 4];
        stream.read_exact(&mut buffer).expect("Failed to read");
        assert_eq!(&buffer, b"ack!");

        handle.join().expect("Thread panicked");
    }

    #[test]
    fn test_connect_to_exhausted_candidates_is_an_error() {
        // Bind and drop so the port has nothing listening on it.
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        drop(listener);

        assert!(connect_to("127.0.0.1", port).is_err());
    }
}
